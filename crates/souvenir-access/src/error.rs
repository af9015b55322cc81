//! Error types for slot access.
//!
//! Every accessor failure is terminal for the read that raised it: there is no
//! warning path. Callers propagate the error with `?` and the processor
//! abandons the one module instance being inspected.

use souvenir_core::{HostError, SlotInfo, SlotType, Visibility};
use thiserror::Error;

/// A failed read or write through an accessor.
#[derive(Debug, Error)]
pub enum AccessError {
    /// `get` was called on an accessor with no bound target.
    #[error("Slot {slot} has no bound target")]
    Unbound { slot: SlotInfo },

    /// The slot held null and null was not allowed.
    #[error("Slot {slot} is null")]
    NullValue { slot: SlotInfo },

    /// The whole-value validator rejected the value.
    #[error("Slot {slot} with value {value} did not pass validity check: {reason}")]
    ValidationFailed {
        slot: SlotInfo,
        value: String,
        reason: String,
    },

    /// A collection's element count was outside the requested bounds.
    #[error("Slot {slot} has unexpected length {actual} (expected {expected})")]
    LengthOutOfRange {
        slot: SlotInfo,
        actual: usize,
        expected: String,
    },

    /// A collection contained a null element and null elements were not allowed.
    #[error("Slot {slot} (length {length}) contained a null value at index {index}")]
    NullElement {
        slot: SlotInfo,
        length: usize,
        index: usize,
    },

    /// The element validator rejected one element.
    #[error(
        "Slot {slot} (length {length}) contained value {value} at index {index} that did not pass validity check: {reason}"
    )]
    ElementValidationFailed {
        slot: SlotInfo,
        length: usize,
        value: String,
        index: usize,
        reason: String,
    },

    /// The untyped value could not be converted to the accessor's type.
    #[error("Slot {slot} with value {value} could not be read as {expected}: {source}")]
    Conversion {
        slot: SlotInfo,
        value: String,
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The host object failed the underlying read or write.
    #[error("Slot {slot} could not be accessed: {source}")]
    Host {
        slot: SlotInfo,
        #[source]
        source: HostError,
    },
}

impl AccessError {
    /// The slot the failure is about.
    pub fn slot(&self) -> &SlotInfo {
        match self {
            AccessError::Unbound { slot }
            | AccessError::NullValue { slot }
            | AccessError::ValidationFailed { slot, .. }
            | AccessError::LengthOutOfRange { slot, .. }
            | AccessError::NullElement { slot, .. }
            | AccessError::ElementValidationFailed { slot, .. }
            | AccessError::Conversion { slot, .. }
            | AccessError::Host { slot, .. } => slot,
        }
    }
}

/// Result type alias for accessor operations.
pub type AccessResult<T> = Result<T, AccessError>;

/// A failed slot lookup.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Type '{type_name}' has no slot named '{slot}'")]
    SlotNotFound { type_name: String, slot: String },

    #[error("Slot {slot} is {actual}, expected {expected}")]
    VisibilityMismatch {
        slot: SlotInfo,
        expected: Visibility,
        actual: Visibility,
    },

    #[error("Slot {slot} is declared as {declared}, cannot be read as {requested}")]
    TypeMismatch {
        slot: SlotInfo,
        declared: SlotType,
        requested: SlotType,
    },
}
