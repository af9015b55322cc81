//! Lua tables as host objects.
//!
//! Expected table shape:
//! ```lua
//! {
//!   __type = "ColoredSquaresModule",       -- required: type name
//!   __slots = {                            -- required: slot declarations
//!     _colors = "string[]",                -- leading underscore = private
//!     _stage = "int",
//!     solveCount = "static int",           -- "static " prefix = static slot
//!   },
//!   _colors = { "red", "blue" },
//!   _stage = 0,
//!   solveCount = 0,
//! }
//! ```

use std::collections::HashMap;

use mlua::{Lua, Table, Value};
use souvenir_core::{HostError, HostObject, HostResult, SlotDecl, SlotType, Value as SlotValue};

use crate::convert::{json_to_lua_value, lua_value_to_json};
use crate::error::LuaHostError;

/// A Lua table exposed through [`HostObject`].
pub struct LuaObject {
    lua: Lua,
    table: Table,
    type_name: String,
    slots: HashMap<String, SlotDecl>,
}

impl LuaObject {
    /// Wrap a module table, reading its `__type` and `__slots` declarations.
    pub fn from_table(lua: &Lua, table: Table) -> Result<Self, LuaHostError> {
        let type_name: String = table
            .get::<Option<String>>("__type")?
            .ok_or(LuaHostError::MissingType)?;

        let decls: Table = table
            .get::<Option<Table>>("__slots")?
            .ok_or_else(|| LuaHostError::MissingSlots(type_name.clone()))?;

        let mut slots = HashMap::new();
        for pair in decls.pairs::<String, String>() {
            let (name, text) = pair?;
            let decl = parse_decl(&name, &text)?;
            slots.insert(name, decl);
        }

        tracing::debug!("Loaded Lua object '{}' with {} slots", type_name, slots.len());

        Ok(Self {
            lua: lua.clone(),
            table,
            type_name,
            slots,
        })
    }

    /// The underlying table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    fn declared(&self, slot: &str) -> HostResult<&SlotDecl> {
        self.slots.get(slot).ok_or_else(|| HostError::SlotNotFound {
            type_name: self.type_name.clone(),
            slot: slot.to_string(),
        })
    }

    fn backend(&self, slot: &str, err: mlua::Error) -> HostError {
        HostError::Backend {
            type_name: self.type_name.clone(),
            slot: slot.to_string(),
            message: err.to_string(),
        }
    }
}

fn parse_decl(name: &str, text: &str) -> Result<SlotDecl, LuaHostError> {
    let text = text.trim();
    let (is_static, type_text) = match text.strip_prefix("static ") {
        Some(rest) => (true, rest.trim()),
        None => (false, text),
    };
    let declared: SlotType = type_text
        .parse()
        .map_err(|source| LuaHostError::InvalidSlotType {
            slot: name.to_string(),
            source,
        })?;

    let mut decl = SlotDecl::new(name, declared);
    if name.starts_with('_') {
        decl = decl.private();
    }
    if is_static {
        decl = decl.static_slot();
    }
    Ok(decl)
}

/// Lua division always yields a float, so an `int` slot may hold `4.0`.
/// Whole floats in `int` positions become integers; fractional ones are kept
/// and fail conversion in the accessor.
fn integral_floats(value: SlotValue, declared: &SlotType) -> SlotValue {
    match (declared, value) {
        (SlotType::Int, SlotValue::Number(n)) => match n.as_f64().filter(|_| n.is_f64()) {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                SlotValue::from(f as i64)
            }
            _ => SlotValue::Number(n),
        },
        (SlotType::Sequence(inner), SlotValue::Array(items)) => SlotValue::Array(
            items
                .into_iter()
                .map(|item| integral_floats(item, inner))
                .collect(),
        ),
        (_, value) => value,
    }
}

impl HostObject for LuaObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn declaration(&self, slot: &str) -> Option<SlotDecl> {
        self.slots.get(slot).cloned()
    }

    fn declarations(&self) -> Vec<SlotDecl> {
        let mut decls: Vec<SlotDecl> = self.slots.values().cloned().collect();
        decls.sort_by(|a, b| a.name.cmp(&b.name));
        decls
    }

    fn read(&self, slot: &str) -> HostResult<SlotValue> {
        let decl = self.declared(slot)?;
        let value: Value = self.table.get(slot).map_err(|e| self.backend(slot, e))?;
        let value = lua_value_to_json(&self.lua, value).map_err(|e| self.backend(slot, e))?;
        Ok(integral_floats(value, &decl.declared))
    }

    fn write(&self, slot: &str, value: SlotValue) -> HostResult<()> {
        self.declared(slot)?;
        let value = json_to_lua_value(&self.lua, &value).map_err(|e| self.backend(slot, e))?;
        self.table.set(slot, value).map_err(|e| self.backend(slot, e))
    }
}

impl std::fmt::Debug for LuaObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LuaObject")
            .field("type_name", &self.type_name)
            .field("slots", &self.slots.len())
            .finish()
    }
}
