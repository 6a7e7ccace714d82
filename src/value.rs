//! Runtime values checked against claims.
//!
//! Parsed JSON converts losslessly into [`Value`] (numbers become `f64`).
//! [`Instance`] stands in for typed runtime objects, the things an
//! `InstanceOf` claim talks about.
use std::fmt;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    Instance(Instance),
}

/// Opaque typed object: a class name, its ancestors (nearest first) and a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub class: String,
    pub extends: Vec<String>,
    pub value: Box<Value>,
}

/// Runtime type name, as reported by `UnexpectedTypeOf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeOf {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
    Instance,
}

impl Value {
    pub fn instance(class: impl Into<String>, value: impl Into<Value>) -> Self {
        Value::Instance(Instance {
            class: class.into(),
            extends: Vec::new(),
            value: Box::new(value.into()),
        })
    }

    pub fn type_of(&self) -> TypeOf {
        match self {
            Value::Null => TypeOf::Null,
            Value::Bool(_) => TypeOf::Boolean,
            Value::Number(_) => TypeOf::Number,
            Value::String(_) => TypeOf::String,
            Value::Array(_) => TypeOf::Array,
            Value::Object(_) => TypeOf::Object,
            Value::Instance(_) => TypeOf::Instance,
        }
    }
}

impl Instance {
    pub fn extending(mut self, ancestor: impl Into<String>) -> Self {
        self.extends.push(ancestor.into());
        self
    }

    /// True when `class` is this instance's class or one of its ancestors.
    pub fn is_instance_of(&self, class: &str) -> bool {
        self.class == class || self.extends.iter().any(|a| a == class)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self { Value::Instance(instance) }
}

// ————————————————————————————————————————————————————————————————————————————
// CONVERSIONS
// ————————————————————————————————————————————————————————————————————————————

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            // as_f64 only fails for arbitrary-precision numbers, which we don't enable
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(xs) => Value::Array(xs.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(m) => {
                Value::Object(m.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::Number(n) }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self { Value::Number(n as f64) }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self { Value::Number(f64::from(n)) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::String(s.to_owned()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::String(s) }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(xs: Vec<T>) -> Self { Value::Array(xs.into_iter().map(Into::into).collect()) }
}

// ————————————————————————————————————————————————————————————————————————————
// SERDE
// ————————————————————————————————————————————————————————————————————————————

/// Largest magnitude at which every integer is exactly representable as f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Integral finite numbers go out as integers, non-finite ones as `null`.
pub(crate) fn serialize_number<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    let n = *n;
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        // -0.0 would print as 0 here; keep its sign visible
        if n == 0.0 && n.is_sign_negative() {
            return serializer.serialize_f64(n);
        }
        serializer.serialize_i64(n as i64)
    } else if n.is_finite() {
        serializer.serialize_f64(n)
    } else {
        serializer.serialize_unit()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serialize_number(n, serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(xs) => xs.serialize(serializer),
            Value::Object(m) => m.serialize(serializer),
            Value::Instance(instance) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("$instance", &instance.class)?;
                map.serialize_entry("extends", &instance.extends)?;
                map.serialize_entry("value", &instance.value)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DISPLAY
// ————————————————————————————————————————————————————————————————————————————

pub(crate) fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n == 0.0 && n.is_sign_negative() {
        f.write_str("-0")
    } else {
        write!(f, "{n}")
    }
}

pub(crate) fn fmt_string(s: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match serde_json::to_string(s) {
        Ok(quoted) => f.write_str(&quoted),
        Err(_) => write!(f, "{s:?}"),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => fmt_number(*n, f),
            Value::String(s) => fmt_string(s, f),
            Value::Array(xs) => {
                f.write_str("[")?;
                for (i, x) in xs.iter().enumerate() {
                    if i > 0 { f.write_str(",")?; }
                    write!(f, "{x}")?;
                }
                f.write_str("]")
            }
            Value::Object(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 { f.write_str(",")?; }
                    fmt_string(k, f)?;
                    write!(f, ":{v}")?;
                }
                f.write_str("}")
            }
            Value::Instance(instance) => write!(f, "{}({})", instance.class, instance.value),
        }
    }
}

impl fmt::Display for TypeOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeOf::Null => "null",
            TypeOf::Boolean => "boolean",
            TypeOf::Number => "number",
            TypeOf::String => "string",
            TypeOf::Array => "array",
            TypeOf::Object => "object",
            TypeOf::Instance => "instance",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_numbers_become_doubles() {
        let v = Value::from(json!({"a": 1, "b": [2.5, "x", null]}));
        let Value::Object(m) = &v else { panic!("expected object") };
        assert_eq!(m["a"], Value::Number(1.0));
        assert_eq!(m["b"], Value::from(json!([2.5, "x", null])));
        assert_eq!(v.type_of(), TypeOf::Object);
    }

    #[test]
    fn integral_numbers_serialize_as_integers() {
        assert_eq!(serde_json::to_value(Value::Number(255.0)).unwrap(), json!(255));
        assert_eq!(serde_json::to_value(Value::Number(3.5)).unwrap(), json!(3.5));
        assert_eq!(serde_json::to_value(Value::Number(f64::NAN)).unwrap(), json!(null));
    }

    #[test]
    fn instances_check_their_ancestors() {
        let Value::Instance(date) = Value::instance("Date", "2024-01-01") else { unreachable!() };
        let date = date.extending("Object");
        assert!(date.is_instance_of("Date"));
        assert!(date.is_instance_of("Object"));
        assert!(!date.is_instance_of("Map"));
    }

    #[test]
    fn display_is_compact_json() {
        let v = Value::from(json!({"k": ["a", 1, true]}));
        assert_eq!(v.to_string(), r#"{"k":["a",1,true]}"#);
        assert_eq!(Value::Number(-0.0).to_string(), "-0");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
    }
}
