//! Human-readable rendering of slot values for diagnostics.

use serde::Serialize;
use serde_json::Value;

/// Rendering of a null value.
pub const NULL_MARKER: &str = "<null>";

/// Render a value the way diagnostics show it.
///
/// - `null` renders as [`NULL_MARKER`]
/// - sequences render as `[a, b, c]`, each element rendered recursively
/// - anything else renders as its text in double quotes
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => NULL_MARKER.to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(render).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::String(s) => format!("\"{}\"", s),
        other => format!("\"{}\"", other),
    }
}

/// Render a typed value by first converting it to its untyped form.
pub fn render_typed<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(v) => render(&v),
        Err(e) => format!("<unrenderable: {}>", e),
    }
}
