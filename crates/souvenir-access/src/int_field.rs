//! Bounded-integer accessor.

use std::sync::Arc;

use souvenir_core::{HostObject, SlotInfo};

use crate::error::AccessResult;
use crate::field::Field;

/// Integer accessor with inclusive range checking.
///
/// Most integer reads only need a closed range, so the range check is built
/// here instead of being handwritten at every call site. The failure reason is
/// `expected {min}–{max}`; an absent bound renders as empty text.
#[derive(Debug)]
pub struct IntField {
    inner: Field<i64>,
}

impl IntField {
    pub fn new(slot: SlotInfo, target: Option<Arc<dyn HostObject>>) -> Self {
        Self {
            inner: Field::new(slot, target),
        }
    }

    /// The underlying scalar accessor (nullable reads, custom validators, `set`).
    pub fn field(&self) -> &Field<i64> {
        &self.inner
    }

    pub fn slot(&self) -> &SlotInfo {
        self.inner.slot()
    }

    /// Read the bound target's value, checking `min <= value <= max`.
    pub fn get(&self, min: Option<i64>, max: Option<i64>) -> AccessResult<i64> {
        self.inner.get(Some(&range_check(min, max)))
    }

    /// Read from an explicit object, checking `min <= value <= max`.
    pub fn get_from(
        &self,
        obj: &dyn HostObject,
        min: Option<i64>,
        max: Option<i64>,
    ) -> AccessResult<i64> {
        self.inner.get_from(obj, Some(&range_check(min, max)))
    }
}

impl From<Field<i64>> for IntField {
    fn from(inner: Field<i64>) -> Self {
        Self { inner }
    }
}

fn range_check(min: Option<i64>, max: Option<i64>) -> impl Fn(&i64) -> Option<String> {
    move |value| {
        let below = min.is_some_and(|min| *value < min);
        let above = max.is_some_and(|max| *value > max);
        (below || above).then(|| format!("expected {}–{}", bound(min), bound(max)))
    }
}

fn bound(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccessError;
    use souvenir_core::{DynamicObject, SlotDecl, SlotType};

    fn stage_field(value: i64) -> (Arc<DynamicObject>, IntField) {
        let obj = Arc::new(
            DynamicObject::new("ColorMathModule")
                .with_slot(SlotDecl::new("_stage", SlotType::Int).private(), value),
        );
        let decl = obj.declaration("_stage").unwrap();
        let target: Arc<dyn HostObject> = obj.clone();
        let field = IntField::new(SlotInfo::new("ColorMathModule", &decl), Some(target));
        (obj, field)
    }

    fn reason(err: AccessError) -> String {
        match err {
            AccessError::ValidationFailed { reason, .. } => reason,
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_in_range_values_pass_unchanged() {
        let (obj, field) = stage_field(0);
        for value in [0, 1, 12, 24, 25] {
            obj.set("_stage", value).unwrap();
            assert_eq!(field.get(Some(0), Some(25)).unwrap(), value);
        }
    }

    #[test]
    fn test_out_of_range_values_fail() {
        let (obj, field) = stage_field(0);
        for value in [-1, 26, i64::MIN, i64::MAX] {
            obj.set("_stage", value).unwrap();
            let err = field.get(Some(0), Some(25)).unwrap_err();
            assert_eq!(reason(err), "expected 0–25");
        }
    }

    #[test]
    fn test_half_open_bounds() {
        let (_obj, field) = stage_field(2);
        assert_eq!(reason(field.get(Some(3), None).unwrap_err()), "expected 3–");
        assert_eq!(reason(field.get(None, Some(1)).unwrap_err()), "expected –1");
        assert_eq!(field.get(None, None).unwrap(), 2);
    }

    #[test]
    fn test_full_message() {
        let (_obj, field) = stage_field(7);
        let err = field.get(Some(1), Some(5)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Slot ColorMathModule._stage with value \"7\" did not pass validity check: expected 1–5"
        );
    }

    #[test]
    fn test_get_from_and_nullable() {
        let (obj, field) = stage_field(4);
        assert_eq!(field.get_from(&*obj, Some(0), Some(4)).unwrap(), 4);

        obj.set("_stage", serde_json::Value::Null).unwrap();
        assert!(matches!(
            field.get(Some(0), Some(4)).unwrap_err(),
            AccessError::NullValue { .. }
        ));
        assert_eq!(field.field().get_nullable(None).unwrap(), None);
    }
}
