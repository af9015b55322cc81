//! Slot descriptors.
//!
//! A slot is a named, typed piece of state exposed by a host object. Hosts
//! declare their slots with a [`SlotDecl`]; accessors carry a [`SlotInfo`]
//! which exists purely to make diagnostics readable.

use std::fmt;
use std::str::FromStr;

// =============================================================================
// Slot Types
// =============================================================================

/// The declared type of a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotType {
    Bool,
    Int,
    Float,
    String,
    /// Ordered sequence (array or list) of the inner type.
    Sequence(Box<SlotType>),
    /// A host-defined record type, identified by name.
    Object(String),
    /// Matches any declared type.
    Any,
}

impl SlotType {
    /// Shorthand for `Sequence(inner)`.
    pub fn sequence_of(inner: SlotType) -> Self {
        SlotType::Sequence(Box::new(inner))
    }

    /// Check whether a slot declared as `self` can be read as `requested`.
    pub fn accepts(&self, requested: &SlotType) -> bool {
        match (self, requested) {
            (SlotType::Any, _) | (_, SlotType::Any) => true,
            (SlotType::Sequence(declared), SlotType::Sequence(requested)) => {
                declared.accepts(requested)
            }
            (declared, requested) => declared == requested,
        }
    }

    /// Element type for sequences, `None` otherwise.
    pub fn element(&self) -> Option<&SlotType> {
        match self {
            SlotType::Sequence(inner) => Some(inner),
            _ => None,
        }
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotType::Bool => f.write_str("bool"),
            SlotType::Int => f.write_str("int"),
            SlotType::Float => f.write_str("float"),
            SlotType::String => f.write_str("string"),
            SlotType::Sequence(inner) => write!(f, "{inner}[]"),
            SlotType::Object(name) => f.write_str(name),
            SlotType::Any => f.write_str("any"),
        }
    }
}

/// Error returned when a declared type string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid slot type '{0}'")]
pub struct SlotTypeParseError(pub String);

impl FromStr for SlotType {
    type Err = SlotTypeParseError;

    /// Parse `int`, `string[]`, `int[][]`, `Record`, `any`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(inner) = trimmed.strip_suffix("[]") {
            return inner
                .parse()
                .map(SlotType::sequence_of)
                .map_err(|_| SlotTypeParseError(s.to_string()));
        }

        match trimmed {
            "bool" => Ok(SlotType::Bool),
            "int" => Ok(SlotType::Int),
            "float" => Ok(SlotType::Float),
            "string" => Ok(SlotType::String),
            "any" => Ok(SlotType::Any),
            name if is_type_name(name) => Ok(SlotType::Object(name.to_string())),
            _ => Err(SlotTypeParseError(s.to_string())),
        }
    }
}

fn is_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

// =============================================================================
// Rust type -> slot type mapping
// =============================================================================

/// Maps a Rust value type onto the [`SlotType`] a host must declare for it.
///
/// The resolver uses this to reject accessors whose type parameter does not
/// match the slot's declared type before any read happens.
pub trait SlotKind {
    fn slot_type() -> SlotType;
}

macro_rules! impl_slot_kind {
    ($slot:expr => $($ty:ty),+) => {
        $(
            impl SlotKind for $ty {
                fn slot_type() -> SlotType {
                    $slot
                }
            }
        )+
    };
}

impl_slot_kind!(SlotType::Bool => bool);
impl_slot_kind!(SlotType::Int => i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);
impl_slot_kind!(SlotType::Float => f32, f64);
impl_slot_kind!(SlotType::String => String, char);
impl_slot_kind!(SlotType::Any => serde_json::Value);

impl<T: SlotKind> SlotKind for Vec<T> {
    fn slot_type() -> SlotType {
        SlotType::sequence_of(T::slot_type())
    }
}

impl<T: SlotKind, const N: usize> SlotKind for [T; N] {
    fn slot_type() -> SlotType {
        SlotType::sequence_of(T::slot_type())
    }
}

// Nullability is not part of a declared type.
impl<T: SlotKind> SlotKind for Option<T> {
    fn slot_type() -> SlotType {
        T::slot_type()
    }
}

// =============================================================================
// Declarations
// =============================================================================

/// Visibility of a slot on its host type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Private => f.write_str("private"),
        }
    }
}

/// A slot as declared by its host type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDecl {
    pub name: String,
    pub declared: SlotType,
    pub visibility: Visibility,
    pub is_static: bool,
}

impl SlotDecl {
    /// Declare a public instance slot.
    pub fn new(name: impl Into<String>, declared: SlotType) -> Self {
        Self {
            name: name.into(),
            declared,
            visibility: Visibility::Public,
            is_static: false,
        }
    }

    /// Mark the slot private.
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Mark the slot static (shared by every instance of the type).
    pub fn static_slot(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Identity of a resolved slot, used for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    /// Name of the type that declares the slot.
    pub declaring_type: String,
    pub name: String,
    pub declared: SlotType,
    pub is_static: bool,
}

impl SlotInfo {
    /// Build the descriptor for a slot declared by `declaring_type`.
    pub fn new(declaring_type: impl Into<String>, decl: &SlotDecl) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: decl.name.clone(),
            declared: decl.declared.clone(),
            is_static: decl.is_static,
        }
    }
}

impl fmt::Display for SlotInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.name)
    }
}
