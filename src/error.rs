use thiserror::Error;

/// Fatal schema-wiring errors. Bad *data* is never reported here; it comes
/// back as a [`crate::Validation`] failure instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidateError {
    /// A reference was needed but the lookup table has no claim under that name.
    #[error("unresolved reference `{name}`: no claim is registered under this name")]
    UnresolvedReference { name: String },

    /// References led back to themselves without stepping into the value.
    #[error("reference cycle that never reaches a value: {}", chain.join(" -> "))]
    ReferenceCycle { chain: Vec<String> },
}

/// Text that is not a valid number range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid number range `{input}`: {reason}")]
pub struct ParseRangeError {
    pub input: String,
    pub reason: String,
}

/// JSON that could not be decoded, with the JSON path where decoding stopped.
#[derive(Error, Debug)]
#[error("at JSON path {path} → {source}")]
pub struct DecodeError {
    pub path: String,
    #[source]
    pub source: serde_json::Error,
}
