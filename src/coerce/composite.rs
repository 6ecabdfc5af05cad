//! Composite destinations: RFC 3339 timestamps and JSON documents.

use std::ops::{Deref, DerefMut};

use chrono::{DateTime, FixedOffset, Utc};
use serde::de::DeserializeOwned;

use super::{first, Coerce, CoerceError, Kind};

fn parse_rfc3339(input: &str) -> Result<DateTime<FixedOffset>, CoerceError> {
    DateTime::parse_from_rfc3339(input).map_err(|source| CoerceError::Timestamp {
        input: input.to_string(),
        source,
    })
}

impl Coerce for DateTime<FixedOffset> {
    const KIND: Kind = Kind::Timestamp;

    fn coerce(raw: &[String]) -> Result<Self, CoerceError> {
        parse_rfc3339(first(raw)?)
    }
}

impl Coerce for DateTime<Utc> {
    const KIND: Kind = Kind::Timestamp;

    fn coerce(raw: &[String]) -> Result<Self, CoerceError> {
        parse_rfc3339(first(raw)?).map(|t| t.with_timezone(&Utc))
    }
}

/// Decodes the first raw value as a JSON document into `T`.
#[doc(hidden)]
pub fn decode_json<T: DeserializeOwned>(raw: &[String]) -> Result<T, CoerceError> {
    let input = first(raw)?;
    serde_json::from_str(input).map_err(|source| CoerceError::Json {
        input: input.to_string(),
        source,
    })
}

/// A field whose raw value is a JSON document decoded into `T`.
///
/// Types that should be filled directly, without the wrapper, can opt in
/// with [`impl_coerce_json!`](crate::impl_coerce_json).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: DeserializeOwned> Coerce for Json<T> {
    const KIND: Kind = Kind::Json;

    fn coerce(raw: &[String]) -> Result<Self, CoerceError> {
        decode_json(raw).map(Json)
    }
}

impl Coerce for serde_json::Value {
    const KIND: Kind = Kind::Json;

    fn coerce(raw: &[String]) -> Result<Self, CoerceError> {
        decode_json(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Greeting {
        hello: String,
    }

    fn raw(value: &str) -> Vec<String> {
        vec![value.to_string()]
    }

    #[test]
    fn test_rfc3339_with_offset() {
        let t = DateTime::<FixedOffset>::coerce(&raw("2024-03-01T12:30:00+02:00")).unwrap();
        assert_eq!(t.offset().local_minus_utc(), 7200);
        assert_eq!(t.to_rfc3339(), "2024-03-01T12:30:00+02:00");
    }

    #[test]
    fn test_rfc3339_normalized_to_utc() {
        let t = DateTime::<Utc>::coerce(&raw("2024-03-01T12:30:00+02:00")).unwrap();
        assert_eq!(t.to_rfc3339(), "2024-03-01T10:30:00+00:00");
    }

    #[test]
    fn test_rejects_non_rfc3339() {
        let err = DateTime::<Utc>::coerce(&raw("01/03/2024")).unwrap_err();
        assert!(matches!(err, CoerceError::Timestamp { .. }));
        assert_eq!(err.input(), Some("01/03/2024"));
    }

    #[test]
    fn test_json_into_composite() {
        let value = Json::<Greeting>::coerce(&raw(r#"{ "hello" : "world" }"#)).unwrap();
        assert_eq!(value.hello, "world");
    }

    #[test]
    fn test_malformed_json_keeps_text() {
        let text = r#"{ "hello" : invalidjson"#;
        let err = Json::<Greeting>::coerce(&raw(text)).unwrap_err();
        assert!(matches!(err, CoerceError::Json { .. }));
        assert_eq!(err.input(), Some(text));
    }

    #[test]
    fn test_json_value() {
        let value = serde_json::Value::coerce(&raw("[1, 2]")).unwrap();
        assert_eq!(value, serde_json::json!([1, 2]));
    }
}
