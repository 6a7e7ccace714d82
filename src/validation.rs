//! Validation results.
//!
//! A [`Validation`] is either `Valid` or a failure that explains itself:
//! the expected shape and the offending value are echoed into the variant,
//! so rendering it never needs the original claim. Container failures keep
//! every child result, valid ones included, so a caller can see exactly
//! which positions or keys went wrong.
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::claim::{Constant, NumberRange, StringFormat, StringRange};
use crate::value::{serialize_number, TypeOf, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "validationType")]
pub enum Validation {
    Valid,
    NotConstant { expected: Constant, actual: Value },
    UnexpectedTypeOf { expected: TypeOf, actual: Value },
    NotInNumberRanges {
        ranges: Vec<NumberRange>,
        #[serde(serialize_with = "serialize_number")]
        actual: f64,
    },
    NotInteger {
        #[serde(serialize_with = "serialize_number")]
        actual: f64,
    },
    NotInStringRange { range: StringRange, actual: String },
    IncorrectFormat { format: StringFormat, actual: String },
    UnexpectedLength { expected: usize, actual: usize },
    Missing,
    NotInstanceOf { class: String, actual: Value },
    NotNever { actual: Value },
    /// A discriminant field failed; sibling fields were not checked.
    DiscriminantInvalid { key: String, validation: Box<Validation> },
    IndexedValidations { validations: Vec<Validation> },
    KeyedValidations { validations: IndexMap<String, Validation> },
    /// Every branch of a union failed, in declaration order.
    UnionOfValidations { validations: Vec<Validation> },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    pub fn is_failure(&self) -> bool {
        !self.is_valid()
    }

    /// `Valid` unless some child failed; then the full child list.
    pub fn indexed(validations: Vec<Validation>) -> Self {
        if validations.iter().all(Validation::is_valid) {
            Validation::Valid
        } else {
            Validation::IndexedValidations { validations }
        }
    }

    /// `Valid` unless some child failed; then the full child map.
    pub fn keyed(validations: IndexMap<String, Validation>) -> Self {
        if validations.values().all(Validation::is_valid) {
            Validation::Valid
        } else {
            Validation::KeyedValidations { validations }
        }
    }

    /// Every located failure below this node. Indexed and keyed containers
    /// are walked; all other failures (unions and discriminants included)
    /// are reported at their own path.
    pub fn failures(&self) -> Vec<(Path, &Validation)> {
        let mut out = Vec::new();
        collect_failures(self, &mut Path::default(), &mut out);
        out
    }

    /// One-line description of this node. `None` for `Valid`.
    pub fn message(&self) -> Option<String> {
        let text = match self {
            Validation::Valid => return None,
            Validation::NotConstant { expected, actual } => format!("expected constant {expected}, got {actual}"),
            Validation::UnexpectedTypeOf { expected, actual } => {
                format!("expected {expected}, got {} {actual}", actual.type_of())
            }
            Validation::NotInNumberRanges { ranges, actual } => {
                let ranges = ranges.iter().map(ToString::to_string).collect::<Vec<_>>().join(" or ");
                format!("{} is outside {ranges}", Value::Number(*actual))
            }
            Validation::NotInteger { actual } => format!("{} is not an integer", Value::Number(*actual)),
            Validation::NotInStringRange { range, actual } => {
                format!("string of length {} is outside {range}", actual.chars().count())
            }
            Validation::IncorrectFormat { format, actual } => {
                format!("{} is not a valid {format}", Value::String(actual.clone()))
            }
            Validation::UnexpectedLength { expected, actual } => {
                format!("expected {expected} elements, got {actual}")
            }
            Validation::Missing => "missing".to_string(),
            Validation::NotInstanceOf { class, actual } => format!("expected an instance of {class}, got {actual}"),
            Validation::NotNever { actual } => format!("no value is allowed here, got {actual}"),
            Validation::DiscriminantInvalid { key, .. } => format!("discriminant `{key}` rejected the record"),
            Validation::IndexedValidations { validations } => {
                format!("{} of {} elements failed", count_failed(validations.iter()), validations.len())
            }
            Validation::KeyedValidations { validations } => {
                format!("{} of {} fields failed", count_failed(validations.values()), validations.len())
            }
            Validation::UnionOfValidations { validations } => {
                format!("none of {} alternatives matched", validations.len())
            }
        };
        Some(text)
    }
}

fn count_failed<'a>(validations: impl Iterator<Item = &'a Validation>) -> usize {
    validations.filter(|v| v.is_failure()).count()
}

fn collect_failures<'a>(validation: &'a Validation, path: &mut Path, out: &mut Vec<(Path, &'a Validation)>) {
    match validation {
        Validation::Valid => {}
        Validation::IndexedValidations { validations } => {
            for (i, child) in validations.iter().enumerate() {
                path.0.push(Segment::Index(i));
                collect_failures(child, path, out);
                path.0.pop();
            }
        }
        Validation::KeyedValidations { validations } => {
            for (key, child) in validations {
                path.0.push(Segment::Key(key.clone()));
                collect_failures(child, path, out);
                path.0.pop();
            }
        }
        failure => out.push((path.clone(), failure)),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PATHS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Index(usize),
    Key(String),
}

/// Location inside a value. Displays as a JSON Pointer, `(root)` when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(pub Vec<Segment>);

impl Path {
    pub fn segments(&self) -> &[Segment] { &self.0 }

    pub fn is_root(&self) -> bool { self.0.is_empty() }

    pub fn join(&self, segment: Segment) -> Path {
        let mut path = self.clone();
        path.0.push(segment);
        path
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for segment in &self.0 {
            match segment {
                Segment::Index(i) => write!(f, "/{i}")?,
                Segment::Key(k) => write!(f, "/{}", k.replace('~', "~0").replace('/', "~1"))?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mismatch(expected: TypeOf, actual: impl Into<Value>) -> Validation {
        Validation::UnexpectedTypeOf { expected, actual: actual.into() }
    }

    #[test]
    fn containers_collapse_when_every_child_is_valid() {
        assert_eq!(Validation::indexed(vec![Validation::Valid, Validation::Valid]), Validation::Valid);
        assert_eq!(Validation::indexed(Vec::new()), Validation::Valid);
        let keyed: IndexMap<String, Validation> = [("a".to_string(), Validation::Valid)].into_iter().collect();
        assert_eq!(Validation::keyed(keyed), Validation::Valid);
    }

    #[test]
    fn containers_keep_valid_children_next_to_failures() {
        let v = Validation::indexed(vec![Validation::Valid, Validation::Missing]);
        assert_eq!(
            v,
            Validation::IndexedValidations { validations: vec![Validation::Valid, Validation::Missing] }
        );
        assert!(v.is_failure());
    }

    #[test]
    fn failures_are_located_by_pointer() {
        let inner: IndexMap<String, Validation> = [
            ("ok".to_string(), Validation::Valid),
            ("a/b".to_string(), mismatch(TypeOf::Number, "x")),
        ]
        .into_iter()
        .collect();
        let v = Validation::IndexedValidations {
            validations: vec![Validation::Valid, Validation::KeyedValidations { validations: inner }, Validation::Missing],
        };
        let located: Vec<String> = v.failures().iter().map(|(path, _)| path.to_string()).collect();
        assert_eq!(located, ["/1/a~1b", "/2"]);
        assert!(Validation::Valid.failures().is_empty());
        assert_eq!(Validation::Missing.failures()[0].0.to_string(), "(root)");
    }

    #[test]
    fn serializes_with_a_validation_type_tag() {
        let v = Validation::NotConstant { expected: Constant::from(256), actual: Value::Number(255.0) };
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({"validationType": "NotConstant", "expected": 256, "actual": 255})
        );
        let v = Validation::IndexedValidations { validations: vec![Validation::Valid, mismatch(TypeOf::Number, "x")] };
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({"validationType": "IndexedValidations", "validations": [
                {"validationType": "Valid"},
                {"validationType": "UnexpectedTypeOf", "expected": "number", "actual": "x"}
            ]})
        );
    }

    #[test]
    fn messages_echo_the_actual_value() {
        let v = Validation::NotInteger { actual: 3.5 };
        assert_eq!(v.message().as_deref(), Some("3.5 is not an integer"));
        let v = mismatch(TypeOf::Boolean, 5);
        assert_eq!(v.message().as_deref(), Some("expected boolean, got number 5"));
        assert_eq!(Validation::Valid.message(), None);
    }
}
