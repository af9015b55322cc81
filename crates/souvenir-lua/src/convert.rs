//! Conversion between Lua values and untyped slot values.

use mlua::{Lua, Result as LuaResult, Value};

/// Convert a Lua value to a JSON value.
///
/// `nil` and the `null` light userdata both become `Null`. A table whose keys
/// are exactly `1..=n` becomes an array (the empty table is an empty array);
/// any other table becomes an object. Functions and other non-data values are
/// skipped inside objects and become `Null` elsewhere.
///
/// Lua cannot store `nil` inside a sequence, so missing elements must use the
/// `null` sentinel. A table with only positive integer keys and a gap, such as
/// `{1, 2, nil, 4}`, is an error rather than an object.
pub fn lua_value_to_json(lua: &Lua, value: Value) -> LuaResult<serde_json::Value> {
    match value {
        Value::Nil => Ok(serde_json::Value::Null),
        Value::LightUserData(ud) if ud.0.is_null() => Ok(serde_json::Value::Null),
        Value::Boolean(b) => Ok(serde_json::Value::Bool(b)),
        Value::Integer(i) => Ok(serde_json::Value::Number(i.into())),
        Value::Number(n) => {
            if let Some(num) = serde_json::Number::from_f64(n) {
                Ok(serde_json::Value::Number(num))
            } else {
                Ok(serde_json::Value::Null)
            }
        }
        Value::String(s) => Ok(serde_json::Value::String(s.to_str()?.to_string())),
        Value::Table(t) => {
            let mut keys = Vec::new();
            for pair in t.pairs::<Value, Value>() {
                let (key, _) = pair?;
                keys.push(key);
            }
            let indices: Option<Vec<i64>> = keys
                .iter()
                .map(|key| match key {
                    Value::Integer(i) if *i >= 1 => Some(*i),
                    _ => None,
                })
                .collect();

            match indices {
                Some(mut indices) => {
                    let len = indices.len();
                    indices.sort_unstable();
                    if let Some(hole) = first_hole(&indices) {
                        return Err(mlua::Error::RuntimeError(format!(
                            "sequence has a nil hole at index {}; use null for missing elements",
                            hole
                        )));
                    }
                    let mut arr = Vec::with_capacity(len);
                    for i in 1..=len {
                        arr.push(lua_value_to_json(lua, t.raw_get::<Value>(i)?)?);
                    }
                    Ok(serde_json::Value::Array(arr))
                }
                None => {
                    let mut obj = serde_json::Map::new();
                    for pair in t.pairs::<String, Value>() {
                        let (k, v) = pair?;
                        if matches!(v, Value::Function(_) | Value::Thread(_)) {
                            continue;
                        }
                        obj.insert(k, lua_value_to_json(lua, v)?);
                    }
                    Ok(serde_json::Value::Object(obj))
                }
            }
        }
        _ => Ok(serde_json::Value::Null),
    }
}

/// First missing index in sorted, distinct, positive table keys.
fn first_hole(indices: &[i64]) -> Option<i64> {
    indices
        .iter()
        .zip(1..)
        .find(|(key, expected)| **key != *expected)
        .map(|(_, expected)| expected)
}

/// Convert a JSON value to a Lua value.
///
/// `Null` becomes the `null` light userdata rather than `nil`, so that null
/// elements keep their position inside sequences.
pub fn json_to_lua_value(lua: &Lua, value: &serde_json::Value) -> LuaResult<Value> {
    match value {
        serde_json::Value::Null => Ok(Value::NULL),
        serde_json::Value::Bool(b) => Ok(Value::Boolean(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Number(f))
            } else {
                Ok(Value::Nil)
            }
        }
        serde_json::Value::String(s) => Ok(Value::String(lua.create_string(s)?)),
        serde_json::Value::Array(arr) => {
            let table = lua.create_table()?;
            for (i, v) in arr.iter().enumerate() {
                table.set(i + 1, json_to_lua_value(lua, v)?)?;
            }
            Ok(Value::Table(table))
        }
        serde_json::Value::Object(obj) => {
            let table = lua.create_table()?;
            for (k, v) in obj {
                table.set(k.as_str(), json_to_lua_value(lua, v)?)?;
            }
            Ok(Value::Table(table))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval(lua: &Lua, code: &str) -> serde_json::Value {
        let value: Value = lua.load(code).eval().unwrap();
        lua_value_to_json(lua, value).unwrap()
    }

    #[test]
    fn test_scalars() {
        let lua = Lua::new();
        assert_eq!(eval(&lua, "return nil"), serde_json::Value::Null);
        assert_eq!(eval(&lua, "return 3"), json!(3));
        assert_eq!(eval(&lua, "return 2.5"), json!(2.5));
        assert_eq!(eval(&lua, "return 'K'"), json!("K"));
        assert_eq!(eval(&lua, "return true"), json!(true));
    }

    #[test]
    fn test_tables() {
        let lua = Lua::new();
        assert_eq!(eval(&lua, "return {}"), json!([]));
        assert_eq!(eval(&lua, "return {'a', 'b'}"), json!(["a", "b"]));
        assert_eq!(eval(&lua, "return {{1, 2}, {3}}"), json!([[1, 2], [3]]));
        assert_eq!(
            eval(&lua, "return {color = 'red', cut = false}"),
            json!({"color": "red", "cut": false})
        );
    }

    #[test]
    fn test_null_sentinel_keeps_position() {
        let lua = Lua::new();
        lua.globals().set("null", Value::NULL).unwrap();
        assert_eq!(
            eval(&lua, "return {'a', null, 'c'}"),
            json!(["a", null, "c"])
        );
    }

    #[test]
    fn test_nil_hole_is_an_error() {
        let lua = Lua::new();
        let value: Value = lua.load("return {1, 2, nil, 4}").eval().unwrap();
        let err = lua_value_to_json(&lua, value).unwrap_err();
        assert!(err.to_string().contains("nil hole at index 3"));

        // Sparse keys that are not all integers still make an object.
        assert_eq!(
            eval(&lua, "return {[1] = 'a', [3] = 'c', name = 'x'}"),
            json!({"1": "a", "3": "c", "name": "x"})
        );
    }

    #[test]
    fn test_json_round_trip_through_lua() {
        let lua = Lua::new();
        let original = json!({"letters": ["A", null, "C"], "stage": 2});
        let value = json_to_lua_value(&lua, &original).unwrap();
        assert_eq!(lua_value_to_json(&lua, value).unwrap(), original);
    }
}
