//! Lua-scripted host objects.
//!
//! Modules are Lua tables that declare their slots under `__slots`. They are
//! exposed to the accessor layer through [`LuaObject`], and driven through
//! [`LuaModule`], which also carries the module's solve signal.

pub mod convert;
pub mod error;
pub mod module;
pub mod object;

pub use convert::{json_to_lua_value, lua_value_to_json};
pub use error::LuaHostError;
pub use module::LuaModule;
pub use object::LuaObject;
