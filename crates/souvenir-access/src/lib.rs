//! Typed, validated accessors over host object slots.
//!
//! This crate turns an untyped slot on a [`HostObject`](souvenir_core::HostObject)
//! into a typed value with length, range, null and content validation, and
//! uniform failure reporting:
//! - [`Field`] - scalar accessor with an optional whole-value validator
//! - [`IntField`] - integer accessor with inclusive range checks
//! - [`ListField`] - sequence accessor with [`Shape`] and per-element checks
//! - [`Resolver`] - name-based slot lookup that builds the accessors
//!
//! Every operation returns [`AccessResult`]; the first failing check aborts the read.

pub mod error;
pub mod field;
pub mod int_field;
pub mod list_field;
pub mod resolver;

pub use error::{AccessError, AccessResult, ResolveError};
pub use field::{Field, Validator};
pub use int_field::IntField;
pub use list_field::{ListField, Shape};
pub use resolver::{Lookup, Resolver};
