//! Slot resolution.
//!
//! Looks a slot up by name on a host object, checks its visibility and its
//! declared type against the accessor's type parameter, and builds an
//! accessor bound to that object. A successfully built accessor can assume
//! the declared type matches; the only read-time type failures left are hosts
//! storing values that disagree with their own declarations.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use souvenir_core::{HostObject, SlotInfo, SlotKind, SlotType, Visibility};

use crate::error::ResolveError;
use crate::field::Field;
use crate::int_field::IntField;
use crate::list_field::ListField;

/// Visibility filter for a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lookup {
    #[default]
    Any,
    Public,
    Private,
}

impl Lookup {
    fn expected(self) -> Option<Visibility> {
        match self {
            Lookup::Any => None,
            Lookup::Public => Some(Visibility::Public),
            Lookup::Private => Some(Visibility::Private),
        }
    }
}

/// Builds accessors for the slots of one host object.
#[derive(Clone)]
pub struct Resolver {
    target: Arc<dyn HostObject>,
}

impl Resolver {
    pub fn new(target: Arc<dyn HostObject>) -> Self {
        Self { target }
    }

    /// The object accessors are bound to.
    pub fn target(&self) -> &Arc<dyn HostObject> {
        &self.target
    }

    /// Resolve a scalar slot of type `T`.
    pub fn field<T>(&self, name: &str, lookup: Lookup) -> Result<Field<T>, ResolveError>
    where
        T: SlotKind + DeserializeOwned + Serialize,
    {
        let slot = self.slot_info(name, lookup, T::slot_type())?;
        Ok(Field::new(slot, Some(self.target.clone())))
    }

    /// Resolve an integer slot.
    pub fn int(&self, name: &str, lookup: Lookup) -> Result<IntField, ResolveError> {
        let slot = self.slot_info(name, lookup, SlotType::Int)?;
        Ok(IntField::new(slot, Some(self.target.clone())))
    }

    /// Resolve a sequence slot with element type `T`.
    pub fn list<T>(&self, name: &str, lookup: Lookup) -> Result<ListField<T>, ResolveError>
    where
        T: SlotKind + DeserializeOwned + Serialize,
    {
        let slot = self.slot_info(name, lookup, Vec::<T>::slot_type())?;
        Ok(ListField::new(slot, Some(self.target.clone())))
    }

    fn slot_info(
        &self,
        name: &str,
        lookup: Lookup,
        requested: SlotType,
    ) -> Result<SlotInfo, ResolveError> {
        let type_name = self.target.type_name();
        let decl = self
            .target
            .declaration(name)
            .ok_or_else(|| ResolveError::SlotNotFound {
                type_name: type_name.to_string(),
                slot: name.to_string(),
            })?;
        let slot = SlotInfo::new(type_name, &decl);

        if let Some(expected) = lookup.expected() {
            if decl.visibility != expected {
                return Err(ResolveError::VisibilityMismatch {
                    slot,
                    expected,
                    actual: decl.visibility,
                });
            }
        }

        if !decl.declared.accepts(&requested) {
            return Err(ResolveError::TypeMismatch {
                slot,
                declared: decl.declared,
                requested,
            });
        }

        tracing::debug!("Resolved slot {} as {}", slot, requested);
        Ok(slot)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("target", &self.target.type_name())
            .finish()
    }
}
