//! Scalar accessor.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

use souvenir_core::{render, HostObject, SlotInfo, Value};

use crate::error::{AccessError, AccessResult};

/// Caller-supplied check: `None` accepts the value, `Some(reason)` rejects it.
pub type Validator<'a, T> = dyn Fn(&T) -> Option<String> + 'a;

/// Typed view onto one named slot of a host object.
///
/// The accessor holds the slot's identity and, optionally, a default target.
/// It never caches: every `get` reads the live value from the host.
///
/// Reads come in two flavours. `get*` rejects null with
/// [`AccessError::NullValue`]; `get*_nullable` returns `Ok(None)` for null
/// without calling the validator.
pub struct Field<T> {
    slot: SlotInfo,
    target: Option<Arc<dyn HostObject>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Field<T>
where
    T: DeserializeOwned + Serialize,
{
    /// Wrap an already-resolved slot. `target` is the default host object
    /// for `get`/`set`; `None` leaves only the `_from` forms usable.
    pub fn new(slot: SlotInfo, target: Option<Arc<dyn HostObject>>) -> Self {
        Self {
            slot,
            target,
            _marker: PhantomData,
        }
    }

    /// The slot this accessor reads.
    pub fn slot(&self) -> &SlotInfo {
        &self.slot
    }

    /// The default target, if bound.
    pub fn target(&self) -> Option<&Arc<dyn HostObject>> {
        self.target.as_ref()
    }

    /// Read the bound target's value; null is an error.
    pub fn get(&self, validator: Option<&Validator<'_, T>>) -> AccessResult<T> {
        self.get_from(self.bound_target()?, validator)
    }

    /// Read the bound target's value; null yields `None`.
    pub fn get_nullable(&self, validator: Option<&Validator<'_, T>>) -> AccessResult<Option<T>> {
        self.get_from_nullable(self.bound_target()?, validator)
    }

    /// Read the slot from an explicit object; null is an error.
    pub fn get_from(
        &self,
        obj: &dyn HostObject,
        validator: Option<&Validator<'_, T>>,
    ) -> AccessResult<T> {
        match self.get_from_nullable(obj, validator)? {
            Some(value) => Ok(value),
            None => Err(reject(AccessError::NullValue {
                slot: self.slot.clone(),
            })),
        }
    }

    /// Read the slot from an explicit object; null yields `None`.
    pub fn get_from_nullable(
        &self,
        obj: &dyn HostObject,
        validator: Option<&Validator<'_, T>>,
    ) -> AccessResult<Option<T>> {
        let raw = self.read_raw(obj)?;
        if raw.is_null() {
            return Ok(None);
        }

        let value: T = convert(&self.slot, &raw)?;
        if let Some(reason) = validator.and_then(|check| check(&value)) {
            return Err(reject(AccessError::ValidationFailed {
                slot: self.slot.clone(),
                value: render(&raw),
                reason,
            }));
        }
        Ok(Some(value))
    }

    /// Write a value to the bound target. No validation on write.
    pub fn set(&self, value: &T) -> AccessResult<()> {
        self.write_value(value)
    }

    pub(crate) fn write_value<S: Serialize + ?Sized>(&self, value: &S) -> AccessResult<()> {
        let raw = serde_json::to_value(value).map_err(|source| AccessError::Conversion {
            slot: self.slot.clone(),
            value: "<unserializable>".to_string(),
            expected: std::any::type_name::<S>(),
            source,
        })?;
        self.bound_target()?
            .write(&self.slot.name, raw)
            .map_err(|source| AccessError::Host {
                slot: self.slot.clone(),
                source,
            })
    }

    pub(crate) fn bound_target(&self) -> AccessResult<&dyn HostObject> {
        match &self.target {
            Some(target) => Ok(target.as_ref()),
            None => Err(reject(AccessError::Unbound {
                slot: self.slot.clone(),
            })),
        }
    }

    pub(crate) fn read_raw(&self, obj: &dyn HostObject) -> AccessResult<Value> {
        obj.read(&self.slot.name).map_err(|source| {
            reject(AccessError::Host {
                slot: self.slot.clone(),
                source,
            })
        })
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("slot", &self.slot)
            .field("bound", &self.target.is_some())
            .finish()
    }
}

/// Convert an untyped value into `U`, reporting failures against `slot`.
pub(crate) fn convert<U: DeserializeOwned>(slot: &SlotInfo, raw: &Value) -> AccessResult<U> {
    U::deserialize(raw).map_err(|source| {
        reject(AccessError::Conversion {
            slot: slot.clone(),
            value: render(raw),
            expected: std::any::type_name::<U>(),
            source,
        })
    })
}

/// Log a failure on its way out.
pub(crate) fn reject(err: AccessError) -> AccessError {
    tracing::debug!("Rejected read of {}: {}", err.slot(), err);
    err
}
