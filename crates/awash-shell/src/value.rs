//! Runtime values held in a session's binding table.

use std::fmt;

use serde_json::Value as JsonValue;

/// Member names every value answers through dotted access, regardless of
/// its type. `Json` objects additionally expose their own keys.
pub const UNIVERSAL_MEMBERS: &[&str] = &["json", "len", "str", "type"];

/// A runtime value.
///
/// Supports primitives (null, bool, int, float, string), structured JSON
/// data, and the silent marker `Void`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Structured JSON data (arrays, objects, nested structures).
    Json(JsonValue),
    /// The silent result: an evaluation settling to exactly this value is
    /// displayed as if it produced nothing at all.
    Void,
}

impl Value {
    /// Short type tag, also used in member-lookup errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Json(_) => "json",
            Value::Void => "void",
        }
    }

    /// Whether this is the display-suppressing marker value.
    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    /// Element count: characters of a string, entries of a JSON array or
    /// object, 0 for null and void, 1 for the remaining scalars.
    pub fn len(&self) -> usize {
        match self {
            Value::Null | Value::Void => 0,
            Value::Str(s) => s.chars().count(),
            Value::Json(JsonValue::Array(items)) => items.len(),
            Value::Json(JsonValue::Object(map)) => map.len(),
            _ => 1,
        }
    }

    /// Whether [`Value::len`] is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JSON rendition of this value. `Void` and non-finite floats render
    /// as JSON null.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null | Value::Void => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(n) => JsonValue::from(*n),
            Value::Float(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Str(s) => JsonValue::String(s.clone()),
            Value::Json(json) => json.clone(),
        }
    }

    /// Resolve a dotted member. Universal members are answered for every
    /// value; a `Json` object also answers its own keys.
    pub fn member(&self, name: &str) -> Option<Value> {
        match name {
            "type" => Some(Value::Str(self.type_name().to_string())),
            "str" => Some(Value::Str(self.to_string())),
            "json" => Some(Value::Str(self.to_json().to_string())),
            "len" => Some(Value::Int(self.len() as i64)),
            _ => match self {
                Value::Json(JsonValue::Object(map)) => {
                    map.get(name).cloned().map(json_to_value)
                }
                _ => None,
            },
        }
    }

    /// Every member name this value answers, sorted: the universal members
    /// plus any `Json` object keys.
    pub fn members(&self) -> Vec<String> {
        let mut names: Vec<String> = UNIVERSAL_MEMBERS.iter().map(|m| m.to_string()).collect();
        if let Value::Json(JsonValue::Object(map)) = self {
            names.extend(map.keys().cloned());
        }
        names.sort();
        names.dedup();
        names
    }
}

/// Convert parsed JSON into a value: scalars unwrap to their primitive
/// variants, containers stay `Json`.
pub fn json_to_value(json: JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => Value::Str(s),
        other => Value::Json(other),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Json(json) => write!(f, "{json}"),
            Value::Void => write!(f, "void"),
        }
    }
}
