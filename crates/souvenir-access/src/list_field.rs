//! Collection accessor.
//!
//! Covers both fixed-size and variable-size sequences. Two read paths share
//! one validation routine:
//!
//! - the shape-bound path (`get`, `get_nullable`, `get_from`, `get_from_nullable`)
//!   checks a [`Shape`] (length bounds, null elements) and an optional
//!   per-element validator;
//! - the whole-value path (`get_whole`, `get_whole_from`) runs one validator
//!   over the entire sequence, for constraints that are awkward as min/max.
//!
//! ## Algorithm (shape-bound path)
//!
//! 1. Read the raw value; null is returned as `None` by the nullable forms and
//!    rejected by the others.
//! 2. Check the element count against the shape's bounds.
//! 3. Unless null elements are allowed, reject the first null element.
//! 4. Run the element validator left to right; the first rejection wins.
//! 5. Return the elements.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use souvenir_core::{render, HostObject, SlotInfo, Value};

use crate::error::{AccessError, AccessResult};
use crate::field::{convert, reject, Field, Validator};

// =============================================================================
// Shape
// =============================================================================

/// Length and null-content constraints for a collection read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    min: usize,
    max: Option<usize>,
    allow_null_elements: bool,
}

impl Shape {
    /// Exactly `len` elements.
    pub fn exact(len: usize) -> Self {
        Self::between(len, len)
    }

    /// At least `min` elements, unbounded above.
    pub fn at_least(min: usize) -> Self {
        Self {
            min,
            max: None,
            allow_null_elements: false,
        }
    }

    /// Between `min` and `max` elements, inclusive.
    pub fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
            allow_null_elements: false,
        }
    }

    /// Permit null elements. The element type must then be an `Option`.
    pub fn allow_null_elements(mut self) -> Self {
        self.allow_null_elements = true;
        self
    }

    /// Whether `len` satisfies the bounds.
    pub fn contains(&self, len: usize) -> bool {
        len >= self.min && self.max.map_or(true, |max| len <= max)
    }
}

/// Renders the expected bound: `at least N`, `N`, or `N–M`.
impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            None => write!(f, "at least {}", self.min),
            Some(max) if max == self.min => write!(f, "{}", max),
            Some(max) => write!(f, "{}–{}", self.min, max),
        }
    }
}

// =============================================================================
// ListField
// =============================================================================

/// Typed view onto a sequence-valued slot with element type `T`.
///
/// Elements that may be null must be read with `T = Option<U>` and a shape
/// that allows null elements.
#[derive(Debug)]
pub struct ListField<T> {
    inner: Field<Vec<T>>,
}

impl<T> ListField<T>
where
    T: DeserializeOwned + Serialize,
{
    pub fn new(slot: SlotInfo, target: Option<Arc<dyn HostObject>>) -> Self {
        Self {
            inner: Field::new(slot, target),
        }
    }

    /// The underlying whole-sequence accessor.
    pub fn field(&self) -> &Field<Vec<T>> {
        &self.inner
    }

    pub fn slot(&self) -> &SlotInfo {
        self.inner.slot()
    }

    // =========================================================================
    // Shape-bound path
    // =========================================================================

    /// Read the bound target's sequence; a null sequence is an error.
    pub fn get(
        &self,
        shape: Shape,
        validator: Option<&Validator<'_, T>>,
    ) -> AccessResult<Vec<T>> {
        self.get_from(self.inner.bound_target()?, shape, validator)
    }

    /// Read the bound target's sequence; a null sequence yields `None`
    /// without further checks.
    pub fn get_nullable(
        &self,
        shape: Shape,
        validator: Option<&Validator<'_, T>>,
    ) -> AccessResult<Option<Vec<T>>> {
        self.get_from_nullable(self.inner.bound_target()?, shape, validator)
    }

    /// Read the sequence from an explicit object; a null sequence is an error.
    pub fn get_from(
        &self,
        obj: &dyn HostObject,
        shape: Shape,
        validator: Option<&Validator<'_, T>>,
    ) -> AccessResult<Vec<T>> {
        match self.get_from_nullable(obj, shape, validator)? {
            Some(values) => Ok(values),
            None => Err(reject(AccessError::NullValue {
                slot: self.slot().clone(),
            })),
        }
    }

    /// Read the sequence from an explicit object; a null sequence yields `None`.
    pub fn get_from_nullable(
        &self,
        obj: &dyn HostObject,
        shape: Shape,
        validator: Option<&Validator<'_, T>>,
    ) -> AccessResult<Option<Vec<T>>> {
        let raw = self.inner.read_raw(obj)?;
        if raw.is_null() {
            return Ok(None);
        }

        let items = self.elements(&raw)?;
        let length = items.len();
        if !shape.contains(length) {
            return Err(reject(AccessError::LengthOutOfRange {
                slot: self.slot().clone(),
                actual: length,
                expected: shape.to_string(),
            }));
        }

        if !shape.allow_null_elements {
            self.reject_null_elements(items)?;
        }

        let values = self.convert_elements(&raw)?;
        if let Some(check) = validator {
            for (index, value) in values.iter().enumerate() {
                if let Some(reason) = check(value) {
                    return Err(reject(AccessError::ElementValidationFailed {
                        slot: self.slot().clone(),
                        length,
                        value: render(&items[index]),
                        index,
                        reason,
                    }));
                }
            }
        }

        Ok(Some(values))
    }

    // =========================================================================
    // Whole-value path
    // =========================================================================

    /// Read the bound target's sequence and run one validator over all of it.
    ///
    /// A null sequence is always rejected here, and null elements are always
    /// rejected (checked before the validator runs).
    pub fn get_whole(&self, validator: Option<&Validator<'_, Vec<T>>>) -> AccessResult<Vec<T>> {
        self.get_whole_from(self.inner.bound_target()?, validator)
    }

    /// [`ListField::get_whole`] against an explicit object.
    pub fn get_whole_from(
        &self,
        obj: &dyn HostObject,
        validator: Option<&Validator<'_, Vec<T>>>,
    ) -> AccessResult<Vec<T>> {
        let raw = self.inner.read_raw(obj)?;
        if raw.is_null() {
            return Err(reject(AccessError::NullValue {
                slot: self.slot().clone(),
            }));
        }

        let items = self.elements(&raw)?;
        self.reject_null_elements(items)?;

        let values = self.convert_elements(&raw)?;
        if let Some(reason) = validator.and_then(|check| check(&values)) {
            return Err(reject(AccessError::ValidationFailed {
                slot: self.slot().clone(),
                value: render(&raw),
                reason,
            }));
        }
        Ok(values)
    }

    /// Write the whole sequence to the bound target.
    pub fn set(&self, values: &[T]) -> AccessResult<()> {
        self.inner.write_value(values)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn elements<'v>(&self, raw: &'v Value) -> AccessResult<&'v [Value]> {
        match raw {
            Value::Array(items) => Ok(items.as_slice()),
            other => Err(reject(AccessError::Conversion {
                slot: self.slot().clone(),
                value: render(other),
                expected: std::any::type_name::<Vec<T>>(),
                source: serde::de::Error::custom("expected a sequence"),
            })),
        }
    }

    fn reject_null_elements(&self, items: &[Value]) -> AccessResult<()> {
        match items.iter().position(Value::is_null) {
            Some(index) => Err(reject(AccessError::NullElement {
                slot: self.slot().clone(),
                length: items.len(),
                index,
            })),
            None => Ok(()),
        }
    }

    fn convert_elements(&self, raw: &Value) -> AccessResult<Vec<T>> {
        convert(self.slot(), raw)
    }
}

impl<T> From<Field<Vec<T>>> for ListField<T> {
    fn from(inner: Field<Vec<T>>) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use souvenir_core::{DynamicObject, SlotDecl, SlotType};

    fn colors_host(value: Value) -> Arc<DynamicObject> {
        Arc::new(DynamicObject::new("ColoredSquaresModule").with_slot(
            SlotDecl::new("_colors", "string[]".parse().unwrap()).private(),
            value,
        ))
    }

    fn colors_field<T>(obj: &Arc<DynamicObject>) -> ListField<T>
    where
        T: DeserializeOwned + Serialize,
    {
        let decl = obj.declaration("_colors").unwrap();
        let target: Arc<dyn HostObject> = obj.clone();
        ListField::new(SlotInfo::new("ColoredSquaresModule", &decl), Some(target))
    }

    fn known_color(value: &String) -> Option<String> {
        match value.as_str() {
            "red" | "green" | "blue" | "yellow" | "magenta" => None,
            _ => Some("unknown color".to_string()),
        }
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(Shape::exact(5).to_string(), "5");
        assert_eq!(Shape::at_least(3).to_string(), "at least 3");
        assert_eq!(Shape::between(2, 4).to_string(), "2–4");
    }

    #[test]
    fn test_exact_length() {
        let obj = colors_host(json!(["red", "green", "blue", "yellow", "magenta"]));
        let field = colors_field::<String>(&obj);
        assert_eq!(field.get(Shape::exact(5), Some(&known_color)).unwrap().len(), 5);

        for wrong in [
            json!(["red", "green", "blue", "yellow"]),
            json!(["red", "green", "blue", "yellow", "magenta", "red"]),
        ] {
            obj.set("_colors", wrong).unwrap();
            let err = field.get(Shape::exact(5), None).unwrap_err();
            assert!(matches!(err, AccessError::LengthOutOfRange { .. }));
            assert!(err.to_string().contains("(expected 5)"));
        }
    }

    #[test]
    fn test_at_least_is_unbounded_above() {
        let obj = colors_host(json!([]));
        let field = colors_field::<i64>(&obj);

        for len in [3usize, 10, 1000] {
            obj.set("_colors", json!(vec![1; len])).unwrap();
            assert_eq!(field.get(Shape::at_least(3), None).unwrap().len(), len);
        }

        obj.set("_colors", json!([1, 2])).unwrap();
        let err = field.get(Shape::at_least(3), None).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"Slot ColoredSquaresModule._colors has unexpected length 2 (expected at least 3)"
        );
    }

    #[test]
    fn test_between() {
        let obj = colors_host(json!(["red", "blue"]));
        let field = colors_field::<String>(&obj);
        assert!(field.get(Shape::between(2, 4), None).is_ok());

        obj.set("_colors", json!(["red"])).unwrap();
        let err = field.get(Shape::between(2, 4), None).unwrap_err();
        assert!(err.to_string().ends_with("(expected 2–4)"));
    }

    #[test]
    fn test_first_failing_element_is_reported() {
        let obj = colors_host(json!(["red", "blue", "cyan", "black"]));
        let field = colors_field::<String>(&obj);

        match field.get(Shape::exact(4), Some(&known_color)).unwrap_err() {
            AccessError::ElementValidationFailed {
                index,
                length,
                value,
                reason,
                ..
            } => {
                assert_eq!(index, 2);
                assert_eq!(length, 4);
                assert_eq!(value, "\"cyan\"");
                assert_eq!(reason, "unknown color");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_null_elements() {
        let obj = colors_host(json!(["red", null, "blue", null]));

        let strict = colors_field::<String>(&obj);
        match strict.get(Shape::exact(4), None).unwrap_err() {
            AccessError::NullElement { index, length, .. } => {
                assert_eq!(index, 1);
                assert_eq!(length, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let sparse = colors_field::<Option<String>>(&obj);
        let values = sparse
            .get(Shape::exact(4).allow_null_elements(), None)
            .unwrap();
        assert_eq!(
            values,
            vec![Some("red".to_string()), None, Some("blue".to_string()), None]
        );
    }

    #[test]
    fn test_null_sequence() {
        let obj = colors_host(Value::Null);
        let field = colors_field::<String>(&obj);

        assert!(matches!(
            field.get(Shape::exact(5), None).unwrap_err(),
            AccessError::NullValue { .. }
        ));
        // A null sequence short-circuits: no length check.
        assert_eq!(field.get_nullable(Shape::exact(5), None).unwrap(), None);
    }

    #[test]
    fn test_whole_value_path() {
        let obj = colors_host(json!(["red", "blue"]));
        let field = colors_field::<String>(&obj);
        let not_empty = |v: &Vec<String>| v.is_empty().then(|| "expected not 0".to_string());

        assert_eq!(field.get_whole(Some(&not_empty)).unwrap(), vec!["red", "blue"]);

        obj.set("_colors", json!([])).unwrap();
        let err = field.get_whole(Some(&not_empty)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Slot ColoredSquaresModule._colors with value [] did not pass validity check: expected not 0"
        );

        obj.set("_colors", json!(["red", null])).unwrap();
        assert!(matches!(
            field.get_whole(None).unwrap_err(),
            AccessError::NullElement { index: 1, .. }
        ));

        obj.set("_colors", Value::Null).unwrap();
        assert!(matches!(
            field.get_whole(None).unwrap_err(),
            AccessError::NullValue { .. }
        ));
    }

    #[test]
    fn test_get_from_matches_bound_get() {
        let bound = colors_host(json!(["red", "red", "teal"]));
        let other = colors_host(json!(["red", "red", "teal"]));
        let field = colors_field::<String>(&bound);

        let a = field.get(Shape::exact(3), Some(&known_color)).unwrap_err().to_string();
        let b = field
            .get_from(&*other, Shape::exact(3), Some(&known_color))
            .unwrap_err()
            .to_string();
        assert_eq!(a, b);

        bound.set("_colors", json!(["red"])).unwrap();
        other.set("_colors", json!(["red"])).unwrap();
        assert_eq!(
            field.get(Shape::exact(1), None).unwrap(),
            field.get_from(&*other, Shape::exact(1), None).unwrap()
        );
    }

    #[test]
    fn test_non_sequence_value() {
        let obj = colors_host(json!("red"));
        let field = colors_field::<String>(&obj);
        assert!(matches!(
            field.get(Shape::exact(1), None).unwrap_err(),
            AccessError::Conversion { .. }
        ));

        let message = field.get_whole(None).unwrap_err().to_string();
        assert!(message.starts_with("Slot ColoredSquaresModule._colors with value \"red\""));
        assert!(message.ends_with(": expected a sequence"));
    }

    #[test]
    fn test_nested_sequences() {
        let obj = Arc::new(DynamicObject::new("GridModule").with_slot(
            SlotDecl::new("_grid", SlotType::sequence_of("int[]".parse().unwrap())),
            json!([[1, 2], [3, 4], [5, 6]]),
        ));
        let decl = obj.declaration("_grid").unwrap();
        let target: Arc<dyn HostObject> = obj.clone();
        let field: ListField<Vec<i64>> =
            ListField::new(SlotInfo::new("GridModule", &decl), Some(target));

        let pairs = |row: &Vec<i64>| (row.len() != 2).then(|| "expected 2".to_string());
        assert_eq!(field.get(Shape::exact(3), Some(&pairs)).unwrap()[2], vec![5, 6]);

        obj.set("_grid", json!([[1, 2], [3]])).unwrap();
        let err = field.get(Shape::at_least(1), Some(&pairs)).unwrap_err();
        assert!(err.to_string().contains("contained value [\"3\"] at index 1"));
    }

    #[test]
    fn test_set_sequence() {
        let obj = colors_host(json!([]));
        let field = colors_field::<String>(&obj);
        field.set(&vec!["green".to_string()]).unwrap();
        assert_eq!(obj.get("_colors").unwrap(), json!(["green"]));
    }
}
