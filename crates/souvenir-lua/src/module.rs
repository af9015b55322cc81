//! Lua-scripted modules.
//!
//! A module script returns its table. Methods defined on it mutate slots the
//! way a live puzzle would, and call `self:solve()` once the puzzle is done.
//!
//! ```lua
//! local Module = {
//!   __type = "LetterDisplayModule",
//!   __slots = { _letter = "string" },
//!   _letter = "K",
//! }
//!
//! function Module:press()
//!   self._letter = null
//!   self:solve()
//! end
//!
//! return Module
//! ```

use std::sync::Arc;

use mlua::{Function, Lua, Table, Value};
use souvenir_core::HostObject;
use tokio::sync::watch;

use crate::error::LuaHostError;
use crate::object::LuaObject;

/// A loaded Lua module and its solve signal.
pub struct LuaModule {
    name: String,
    table: Table,
    object: Arc<LuaObject>,
    solved: watch::Receiver<bool>,
}

impl LuaModule {
    /// Evaluate `source` and wrap the returned module table.
    ///
    /// Installs the global `null` sentinel and a `solve` method on the table.
    pub fn load(lua: &Lua, source: &str, name: &str) -> Result<Self, LuaHostError> {
        lua.globals().set("null", Value::NULL)?;

        let table: Table = lua.load(source).set_name(name).eval()?;
        let object = Arc::new(LuaObject::from_table(lua, table.clone())?);

        let (tx, rx) = watch::channel(false);
        let module_name = name.to_string();
        let solve = lua.create_function(move |_, this: Table| {
            this.set("solved", true)?;
            tracing::info!("Module '{}' reported solved", module_name);
            tx.send_replace(true);
            Ok(())
        })?;
        table.set("solved", false)?;
        table.set("solve", solve)?;

        tracing::debug!("Loaded Lua module '{}' ({})", name, object.type_name());

        Ok(Self {
            name: name.to_string(),
            table,
            object,
            solved: rx,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run a method on the module table, passing the table as `self`.
    pub fn call(&self, method: &str) -> Result<(), LuaHostError> {
        let func: Function =
            self.table
                .get::<Option<Function>>(method)?
                .ok_or_else(|| LuaHostError::MissingMethod {
                    module: self.name.clone(),
                    method: method.to_string(),
                })?;
        func.call::<()>(self.table.clone())?;
        Ok(())
    }

    /// The module as a host object.
    pub fn object(&self) -> Arc<dyn HostObject> {
        self.object.clone()
    }

    pub fn lua_object(&self) -> &Arc<LuaObject> {
        &self.object
    }

    /// A receiver that observes `true` once the module calls `self:solve()`.
    pub fn solve_signal(&self) -> watch::Receiver<bool> {
        self.solved.clone()
    }

    pub fn is_solved(&self) -> bool {
        *self.solved.borrow()
    }
}

impl std::fmt::Debug for LuaModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LuaModule")
            .field("name", &self.name)
            .field("solved", &self.is_solved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use souvenir_access::{AccessError, Lookup, Resolver, Shape};

    const SCRIPT: &str = r#"
        local Module = {
            __type = "ColoredSquaresModule",
            __slots = {
                _colors = "string[]",
                _stage = "int",
            },
            _colors = { "red", "blue", "green" },
            _stage = 0,
        }

        function Module:press()
            self._stage = self._stage + 1
            if self._stage == 2 then
                self._colors = { "red", null, "green" }
                self:solve()
            end
        end

        return Module
    "#;

    #[test]
    fn test_accessors_follow_module_state() {
        let lua = Lua::new();
        let module = LuaModule::load(&lua, SCRIPT, "squares").unwrap();
        let resolver = Resolver::new(module.object());

        let stage = resolver.int("_stage", Lookup::Private).unwrap();
        let colors = resolver.list::<String>("_colors", Lookup::Private).unwrap();

        assert_eq!(stage.get(Some(0), Some(2)).unwrap(), 0);
        assert_eq!(
            colors.get(Shape::exact(3), None).unwrap(),
            vec!["red", "blue", "green"]
        );

        module.call("press").unwrap();
        module.call("press").unwrap();
        assert!(module.is_solved());
        assert_eq!(stage.get(Some(0), Some(2)).unwrap(), 2);

        let err = colors.get(Shape::exact(3), None).unwrap_err();
        assert!(matches!(err, AccessError::NullElement { index: 1, .. }));

        let nullable = resolver
            .list::<Option<String>>("_colors", Lookup::Private)
            .unwrap();
        assert_eq!(
            nullable
                .get(Shape::exact(3).allow_null_elements(), None)
                .unwrap(),
            vec![Some("red".to_string()), None, Some("green".to_string())]
        );
    }

    #[tokio::test]
    async fn test_solve_signal() {
        let lua = Lua::new();
        let module = LuaModule::load(&lua, SCRIPT, "squares").unwrap();
        let mut signal = module.solve_signal();
        assert!(!*signal.borrow());

        module.call("press").unwrap();
        assert!(!module.is_solved());
        module.call("press").unwrap();

        signal.changed().await.unwrap();
        assert!(*signal.borrow());
        let solved: bool = module.lua_object().table().get("solved").unwrap();
        assert!(solved);
    }

    #[test]
    fn test_missing_method() {
        let lua = Lua::new();
        let module = LuaModule::load(&lua, SCRIPT, "squares").unwrap();
        assert!(matches!(
            module.call("cut"),
            Err(LuaHostError::MissingMethod { .. })
        ));
    }

    #[test]
    fn test_script_error() {
        let lua = Lua::new();
        assert!(matches!(
            LuaModule::load(&lua, "return {", "broken"),
            Err(LuaHostError::Lua(_))
        ));
    }
}
