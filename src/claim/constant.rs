use std::fmt;

use ordered_float::OrderedFloat;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};

use crate::value::{fmt_number, fmt_string, serialize_number, Value};

/// Literal accepted by a constant claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum Constant {
    Null,
    Bool(bool),
    Number(OrderedFloat<f64>),
    String(String),
}

impl Constant {
    /// Same-value comparison: NaN matches NaN, `0` and `-0` are distinct.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Constant::Null, Value::Null) => true,
            (Constant::Bool(a), Value::Bool(b)) => a == b,
            (Constant::Number(a), Value::Number(b)) => same_value(a.0, *b),
            (Constant::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

fn same_value(a: f64, b: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    a == b && a.is_sign_negative() == b.is_sign_negative()
}

impl Serialize for Constant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Constant::Null => serializer.serialize_unit(),
            Constant::Bool(b) => serializer.serialize_bool(*b),
            // JSON has no literal for these; `null` would decode as a different constant
            Constant::Number(n) if !n.0.is_finite() => {
                Err(S::Error::custom(format_args!("constant {} has no JSON form", n.0)))
            }
            Constant::Number(n) => serialize_number(&n.0, serializer),
            Constant::String(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Null => f.write_str("null"),
            Constant::Bool(b) => write!(f, "{b}"),
            Constant::Number(n) => fmt_number(n.0, f),
            Constant::String(s) => fmt_string(s, f),
        }
    }
}

impl From<bool> for Constant {
    fn from(b: bool) -> Self { Constant::Bool(b) }
}

impl From<f64> for Constant {
    fn from(n: f64) -> Self { Constant::Number(OrderedFloat(n)) }
}

impl From<i32> for Constant {
    fn from(n: i32) -> Self { Constant::Number(OrderedFloat(f64::from(n))) }
}

impl From<u32> for Constant {
    fn from(n: u32) -> Self { Constant::Number(OrderedFloat(f64::from(n))) }
}

impl From<i64> for Constant {
    fn from(n: i64) -> Self { Constant::Number(OrderedFloat(n as f64)) }
}

impl From<&str> for Constant {
    fn from(s: &str) -> Self { Constant::String(s.to_owned()) }
}

impl From<String> for Constant {
    fn from(s: String) -> Self { Constant::String(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_matches_nan() {
        assert!(Constant::from(f64::NAN).matches(&Value::Number(f64::NAN)));
        assert!(!Constant::from(f64::NAN).matches(&Value::Number(1.0)));
    }

    #[test]
    fn non_finite_constants_refuse_to_serialize() {
        for n in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = serde_json::to_value(Constant::from(n)).unwrap_err();
            assert!(err.to_string().contains("no JSON form"), "message was {err}");
        }
        // never silently turned into the null constant
        let claim = crate::claim::Claim::constant(f64::NAN);
        assert!(serde_json::to_string(&claim).is_err());
        assert_eq!(serde_json::to_value(Constant::from(-0.0)).unwrap(), serde_json::json!(-0.0));
    }

    #[test]
    fn signed_zeros_are_distinct() {
        assert!(Constant::from(0.0).matches(&Value::Number(0.0)));
        assert!(!Constant::from(0.0).matches(&Value::Number(-0.0)));
        assert!(!Constant::from(-0.0).matches(&Value::Number(0.0)));
    }

    #[test]
    fn kinds_never_cross_match() {
        assert!(!Constant::from(1).matches(&Value::from("1")));
        assert!(!Constant::from("true").matches(&Value::Bool(true)));
        assert!(!Constant::Null.matches(&Value::Bool(false)));
        assert!(Constant::Null.matches(&Value::Null));
    }

    #[test]
    fn decodes_untagged_literals() {
        let c: Constant = serde_json::from_str("256").unwrap();
        assert_eq!(c, Constant::from(256));
        let c: Constant = serde_json::from_str(r#""apple""#).unwrap();
        assert_eq!(c, Constant::from("apple"));
        let c: Constant = serde_json::from_str("null").unwrap();
        assert_eq!(c, Constant::Null);
    }
}
