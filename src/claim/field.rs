use serde::{Deserialize, Serialize};

use super::Claim;

/// One named entry of a record claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum Field {
    /// Must be present and valid.
    Regular { key: String, claim: Claim },
    /// May be absent; checked when present.
    Optional { key: String, claim: Claim },
    /// Must be present and valid, otherwise the rest of the record is not looked at.
    Discriminant { key: String, claim: Claim },
    /// Required field whose claim is looked up by name.
    Reference { key: String, reference: String },
    /// Optional field whose claim is looked up by name.
    OptionalReference { key: String, reference: String },
}

/// What a field's value is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget<'a> {
    Claim(&'a Claim),
    Reference(&'a str),
}

impl Field {
    pub fn regular(key: impl Into<String>, claim: Claim) -> Self {
        Field::Regular { key: key.into(), claim }
    }

    pub fn optional(key: impl Into<String>, claim: Claim) -> Self {
        Field::Optional { key: key.into(), claim }
    }

    pub fn discriminant(key: impl Into<String>, claim: Claim) -> Self {
        Field::Discriminant { key: key.into(), claim }
    }

    pub fn reference(key: impl Into<String>, reference: impl Into<String>) -> Self {
        Field::Reference { key: key.into(), reference: reference.into() }
    }

    pub fn optional_reference(key: impl Into<String>, reference: impl Into<String>) -> Self {
        Field::OptionalReference { key: key.into(), reference: reference.into() }
    }

    pub fn key(&self) -> &str {
        match self {
            Field::Regular { key, .. }
            | Field::Optional { key, .. }
            | Field::Discriminant { key, .. }
            | Field::Reference { key, .. }
            | Field::OptionalReference { key, .. } => key,
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, Field::Optional { .. } | Field::OptionalReference { .. })
    }

    pub fn is_discriminant(&self) -> bool {
        matches!(self, Field::Discriminant { .. })
    }

    pub fn target(&self) -> FieldTarget<'_> {
        match self {
            Field::Regular { claim, .. } | Field::Optional { claim, .. } | Field::Discriminant { claim, .. } => {
                FieldTarget::Claim(claim)
            }
            Field::Reference { reference, .. } | Field::OptionalReference { reference, .. } => {
                FieldTarget::Reference(reference)
            }
        }
    }
}
