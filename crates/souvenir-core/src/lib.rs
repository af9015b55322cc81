//! Core types for the Souvenir module processors.
//!
//! This crate contains shared data structures that are used across all Souvenir crates:
//! - Slot descriptors and declared slot types
//! - The host object abstraction and an in-memory host
//! - Diagnostic rendering of untyped values
//! - Configuration types
//! - Error types

mod config;
mod error;
mod host;
mod render;
mod slot;

pub use config::{config_dir, config_path, ProcessorConfig};
pub use error::{ConfigError, HostError, HostResult};
pub use host::{DynamicObject, HostObject};
pub use render::{render, render_typed, NULL_MARKER};
pub use slot::{SlotDecl, SlotInfo, SlotKind, SlotType, SlotTypeParseError, Visibility};

/// Untyped slot value as exchanged with host objects.
pub use serde_json::Value;
