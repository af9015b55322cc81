//! Error types for Lua-hosted modules.

use souvenir_core::SlotTypeParseError;
use thiserror::Error;

/// Errors raised while loading or driving a Lua module.
#[derive(Debug, Error)]
pub enum LuaHostError {
    /// Lua script error.
    #[error("Lua error: {0}")]
    Lua(#[from] mlua::Error),

    /// The module table has no `__type` string.
    #[error("Module table has no __type")]
    MissingType,

    /// The module table has no `__slots` table.
    #[error("Module '{0}' has no __slots table")]
    MissingSlots(String),

    /// A slot declaration could not be parsed.
    #[error("Slot '{slot}' has an invalid type declaration")]
    InvalidSlotType {
        slot: String,
        #[source]
        source: SlotTypeParseError,
    },

    #[error("Module '{module}' has no method '{method}'")]
    MissingMethod { module: String, method: String },
}
