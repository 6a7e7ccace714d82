use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::claim::Claim;
use crate::error::ValidateError;

/// Reference name → claim. Passed into every validation call; never global.
///
/// Decodes from a plain JSON object: `{ "node": { "claim": "integer", "ranges": ["n"] } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lookup {
    claims: IndexMap<String, Claim>,
}

impl Lookup {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, name: impl Into<String>, claim: Claim) -> Self {
        self.insert(name, claim);
        self
    }

    /// Returns the claim previously registered under `name`, if any.
    pub fn insert(&mut self, name: impl Into<String>, claim: Claim) -> Option<Claim> {
        self.claims.insert(name.into(), claim)
    }

    pub fn get(&self, name: &str) -> Option<&Claim> {
        self.claims.get(name)
    }

    pub fn resolve(&self, name: &str) -> Result<&Claim, ValidateError> {
        self.get(name).ok_or_else(|| ValidateError::UnresolvedReference { name: name.to_owned() })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.claims.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize { self.claims.len() }

    pub fn is_empty(&self) -> bool { self.claims.is_empty() }
}

impl<K: Into<String>> FromIterator<(K, Claim)> for Lookup {
    fn from_iter<I: IntoIterator<Item = (K, Claim)>>(iter: I) -> Self {
        Self { claims: iter.into_iter().map(|(k, c)| (k.into(), c)).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_reports_the_missing_name() {
        let lookup = Lookup::new().with("num", Claim::integer());
        assert_eq!(lookup.resolve("num").unwrap(), &Claim::integer());
        assert_eq!(
            lookup.resolve("nope"),
            Err(ValidateError::UnresolvedReference { name: "nope".into() })
        );
    }

    #[test]
    fn decodes_from_a_json_object() {
        let lookup: Lookup = serde_json::from_str(
            r#"{ "flag": { "claim": "boolean" }, "id": { "claim": "uuid" } }"#,
        )
        .unwrap();
        assert_eq!(lookup.names().collect::<Vec<_>>(), ["flag", "id"]);
        assert_eq!(lookup.get("flag"), Some(&Claim::boolean()));
    }

    #[test]
    fn collects_from_pairs() {
        let lookup: Lookup = [("a", Claim::unknown()), ("b", Claim::never())].into_iter().collect();
        assert_eq!(lookup.len(), 2);
        assert!(!lookup.is_empty());
    }
}
