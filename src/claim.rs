//! Claims: plain, immutable descriptions of an expected value shape.
//!
//! A claim carries no behavior; the engine in [`crate::validate`] gives it
//! meaning. Claims serialize to JSON tagged by `"claim"`:
//!
//! ```json
//! { "claim": "record", "fields": [
//!     { "field": "discriminant", "key": "kind", "claim": { "claim": "constant", "constant": "circle" } },
//!     { "field": "regular", "key": "radius", "claim": { "claim": "number", "ranges": ["0 < n"] } },
//!     { "field": "optionalReference", "key": "label", "reference": "label" }
//! ] }
//! ```
pub mod constant;
pub mod field;
pub mod number;
pub mod string;

use serde::{Deserialize, Deserializer, Serialize};

pub use constant::Constant;
pub use field::{Field, FieldTarget};
pub use number::{Bound, NumberRange};
pub use string::{StringFormat, StringRange};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "claim", rename_all = "camelCase")]
pub enum Claim {
    Constant { constant: Constant },
    /// Any number inside at least one of `ranges`. Omitted or empty means any number.
    Number {
        #[serde(default = "any_ranges", deserialize_with = "deserialize_ranges")]
        ranges: Vec<NumberRange>,
    },
    /// Like `Number`, and additionally finite with no fractional part.
    Integer {
        #[serde(default = "any_ranges", deserialize_with = "deserialize_ranges")]
        ranges: Vec<NumberRange>,
    },
    String { range: StringRange },
    Uuid,
    DateString,
    Boolean,
    Unknown,
    Never,
    Array { element: Box<Claim> },
    Tuple { slots: Vec<Claim> },
    Record { fields: Vec<Field> },
    /// Nominal marker; checks exactly like `claim`, which is written `"of"` on the wire.
    Brand {
        brand: String,
        #[serde(rename = "of")]
        claim: Box<Claim>,
    },
    InstanceOf { class: String },
    Or { claims: Vec<Claim> },
    /// Stands for the claim registered under `reference` in the lookup table.
    IndexedReference { reference: String },
}

fn ranges_or_any(ranges: impl IntoIterator<Item = NumberRange>) -> Vec<NumberRange> {
    let ranges: Vec<NumberRange> = ranges.into_iter().collect();
    if ranges.is_empty() { any_ranges() } else { ranges }
}

fn any_ranges() -> Vec<NumberRange> {
    vec![NumberRange::ANY]
}

fn deserialize_ranges<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<NumberRange>, D::Error> {
    Vec::<NumberRange>::deserialize(deserializer).map(ranges_or_any)
}

impl Claim {
    pub fn constant(constant: impl Into<Constant>) -> Self {
        Claim::Constant { constant: constant.into() }
    }

    pub fn number(ranges: impl IntoIterator<Item = NumberRange>) -> Self {
        Claim::Number { ranges: ranges_or_any(ranges) }
    }

    pub fn any_number() -> Self {
        Claim::Number { ranges: any_ranges() }
    }

    pub fn integer() -> Self {
        Claim::Integer { ranges: any_ranges() }
    }

    pub fn integer_in(ranges: impl IntoIterator<Item = NumberRange>) -> Self {
        Claim::Integer { ranges: ranges_or_any(ranges) }
    }

    pub fn string(min: usize, max: usize) -> Self {
        Claim::String { range: StringRange::new(min, max) }
    }

    pub fn any_string() -> Self {
        Claim::String { range: StringRange::ANY }
    }

    pub fn uuid() -> Self { Claim::Uuid }

    pub fn date_string() -> Self { Claim::DateString }

    pub fn boolean() -> Self { Claim::Boolean }

    pub fn unknown() -> Self { Claim::Unknown }

    pub fn never() -> Self { Claim::Never }

    pub fn array(element: Claim) -> Self {
        Claim::Array { element: Box::new(element) }
    }

    pub fn tuple(slots: impl IntoIterator<Item = Claim>) -> Self {
        Claim::Tuple { slots: slots.into_iter().collect() }
    }

    pub fn record(fields: impl IntoIterator<Item = Field>) -> Self {
        Claim::Record { fields: fields.into_iter().collect() }
    }

    pub fn brand(brand: impl Into<String>, claim: Claim) -> Self {
        Claim::Brand { brand: brand.into(), claim: Box::new(claim) }
    }

    pub fn instance_of(class: impl Into<String>) -> Self {
        Claim::InstanceOf { class: class.into() }
    }

    pub fn or(claims: impl IntoIterator<Item = Claim>) -> Self {
        Claim::Or { claims: claims.into_iter().collect() }
    }

    pub fn reference(reference: impl Into<String>) -> Self {
        Claim::IndexedReference { reference: reference.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_ranges_mean_any_number() {
        assert_eq!(Claim::number(Vec::<NumberRange>::new()), Claim::any_number());
        assert_eq!(Claim::integer_in(Vec::<NumberRange>::new()), Claim::integer());
    }

    #[test]
    fn decodes_tagged_json() {
        let claim: Claim = serde_json::from_value(json!({
            "claim": "record",
            "fields": [
                { "field": "discriminant", "key": "kind", "claim": { "claim": "constant", "constant": "circle" } },
                { "field": "regular", "key": "radius", "claim": { "claim": "number", "ranges": ["0 < n"] } },
                { "field": "optionalReference", "key": "label", "reference": "label" }
            ]
        }))
        .unwrap();

        let expected = Claim::record([
            Field::discriminant("kind", Claim::constant("circle")),
            Field::regular("radius", Claim::number(["0 < n".parse::<NumberRange>().unwrap()])),
            Field::optional_reference("label", "label"),
        ]);
        assert_eq!(claim, expected);
    }

    #[test]
    fn encodes_unit_variants_by_tag() {
        assert_eq!(serde_json::to_value(Claim::date_string()).unwrap(), json!({"claim": "dateString"}));
        assert_eq!(
            serde_json::to_value(Claim::reference("node")).unwrap(),
            json!({"claim": "indexedReference", "reference": "node"})
        );
    }

    #[test]
    fn omitted_or_empty_ranges_decode_as_any_number() {
        let decode = |v: serde_json::Value| serde_json::from_value::<Claim>(v).unwrap();
        assert_eq!(decode(json!({"claim": "number", "ranges": []})), Claim::any_number());
        assert_eq!(decode(json!({"claim": "number"})), Claim::any_number());
        assert_eq!(decode(json!({"claim": "integer"})), Claim::integer());
        assert_eq!(decode(json!({"claim": "integer", "ranges": []})), Claim::integer());
    }

    #[test]
    fn brand_wraps_its_claim_under_of() {
        let claim = Claim::brand("UserId", Claim::uuid());
        let encoded = serde_json::to_value(&claim).unwrap();
        assert_eq!(encoded, json!({"claim": "brand", "brand": "UserId", "of": {"claim": "uuid"}}));
        assert_eq!(serde_json::from_value::<Claim>(encoded).unwrap(), claim);
    }

    #[test]
    fn claims_hash_and_compare_structurally() {
        use std::collections::HashSet;
        let set: HashSet<Claim> = [Claim::constant(1), Claim::constant(1.0), Claim::constant("1")].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
