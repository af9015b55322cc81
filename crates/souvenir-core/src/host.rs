//! Host objects.
//!
//! A host object is an externally managed instance whose state the processors
//! read. Its slots are untyped ([`Value`]); typing and validation are layered
//! on top by the accessors in `souvenir-access`.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{HostError, HostResult};
use crate::slot::SlotDecl;

/// Reflective read/write access to the named slots of one host object.
///
/// Implementations must return the live value on every read: the host may
/// mutate a slot between two reads and accessors never cache.
pub trait HostObject: Send + Sync {
    /// Name of the object's type, used in diagnostics.
    fn type_name(&self) -> &str;

    /// Declaration of the named slot, if the type has one.
    fn declaration(&self, slot: &str) -> Option<SlotDecl>;

    /// All declared slots.
    fn declarations(&self) -> Vec<SlotDecl>;

    /// Read the current value of a slot. `Value::Null` is the host's null.
    fn read(&self, slot: &str) -> HostResult<Value>;

    /// Overwrite the value of a slot.
    fn write(&self, slot: &str, value: Value) -> HostResult<()>;
}

// =============================================================================
// DynamicObject
// =============================================================================

struct DynamicSlot {
    decl: SlotDecl,
    value: Value,
}

/// In-memory host object.
///
/// Slots are declared up front with [`DynamicObject::with_slot`]; the host
/// side then mutates them through [`DynamicObject::set`] while accessors
/// read them through the [`HostObject`] trait.
pub struct DynamicObject {
    type_name: String,
    slots: RwLock<HashMap<String, DynamicSlot>>,
}

impl DynamicObject {
    /// Create an object with no slots.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Declare a slot with its initial value.
    pub fn with_slot(self, decl: SlotDecl, value: impl Into<Value>) -> Self {
        {
            let mut slots = self.slots.write();
            let name = decl.name.clone();
            slots.insert(
                name,
                DynamicSlot {
                    decl,
                    value: value.into(),
                },
            );
        }
        self
    }

    /// Host-side mutation of a declared slot.
    pub fn set(&self, slot: &str, value: impl Into<Value>) -> HostResult<()> {
        self.write(slot, value.into())
    }

    /// Host-side read of a declared slot.
    pub fn get(&self, slot: &str) -> HostResult<Value> {
        self.read(slot)
    }

    fn not_found(&self, slot: &str) -> HostError {
        HostError::SlotNotFound {
            type_name: self.type_name.clone(),
            slot: slot.to_string(),
        }
    }
}

impl HostObject for DynamicObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn declaration(&self, slot: &str) -> Option<SlotDecl> {
        self.slots.read().get(slot).map(|s| s.decl.clone())
    }

    fn declarations(&self) -> Vec<SlotDecl> {
        let mut decls: Vec<SlotDecl> = self.slots.read().values().map(|s| s.decl.clone()).collect();
        decls.sort_by(|a, b| a.name.cmp(&b.name));
        decls
    }

    fn read(&self, slot: &str) -> HostResult<Value> {
        self.slots
            .read()
            .get(slot)
            .map(|s| s.value.clone())
            .ok_or_else(|| self.not_found(slot))
    }

    fn write(&self, slot: &str, value: Value) -> HostResult<()> {
        let mut slots = self.slots.write();
        match slots.get_mut(slot) {
            Some(entry) => {
                entry.value = value;
                Ok(())
            }
            None => Err(self.not_found(slot)),
        }
    }
}

impl std::fmt::Debug for DynamicObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicObject")
            .field("type_name", &self.type_name)
            .field("slot_count", &self.slots.read().len())
            .finish()
    }
}
