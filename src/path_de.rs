//! JSON decoding that says *where* a document stopped making sense.
use serde::de::DeserializeOwned;

use crate::error::DecodeError;

fn located(err: serde_path_to_error::Error<serde_json::Error>) -> DecodeError {
    DecodeError { path: err.path().to_string(), source: err.into_inner() }
}

fn trailing(source: serde_json::Error) -> DecodeError {
    DecodeError { path: ".".into(), source }
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, DecodeError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    let value = serde_path_to_error::deserialize::<_, T>(&mut *de).map_err(located)?;
    de.end().map_err(trailing)?;
    Ok(value)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize::<_, T>(&mut *de).map_err(located)?;
    de.end().map_err(trailing)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::Claim;
    use crate::lookup::Lookup;

    #[test]
    fn decodes_claims() {
        let claim: Claim = from_str_with_path(r#"{"claim": "array", "element": {"claim": "boolean"}}"#).unwrap();
        assert_eq!(claim, Claim::array(Claim::boolean()));
    }

    #[test]
    fn errors_name_the_lookup_entry() {
        let err = from_str_with_path::<Lookup>(r#"{"ok": {"claim": "boolean"}, "bad": {"claim": "bogus"}}"#)
            .unwrap_err();
        // the tag is buffered, so the path stops at the entry's tag field
        assert_eq!(err.path, "bad.claim");
        assert!(err.to_string().starts_with("at JSON path bad.claim"), "message was {err}");
    }

    #[test]
    fn range_errors_surface_their_reason() {
        let err = from_str_with_path::<Claim>(r#"{"claim": "number", "ranges": ["x < n"]}"#).unwrap_err();
        assert!(err.to_string().contains("invalid number range"), "message was {err}");
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert!(from_slice_with_path::<Claim>(br#"{"claim": "unknown"} {"#).is_err());
    }
}
