use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

/// Serializes an optional Duration as seconds, or null
pub fn serialize_opt_duration<S>(
    duration: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    duration.map(|d| d.as_secs_f64()).serialize(serializer)
}

/// Deserializes an optional Duration from seconds
pub fn deserialize_opt_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = Option::<f64>::deserialize(deserializer)?;
    match secs {
        Some(s) if !s.is_finite() || s < 0.0 => {
            Err(serde::de::Error::custom(format!("invalid duration: {}", s)))
        }
        Some(s) => Duration::try_from_secs_f64(s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json;

    #[derive(Serialize, Deserialize)]
    struct Test {
        #[serde(serialize_with = "serialize_opt_duration")]
        #[serde(deserialize_with = "deserialize_opt_duration")]
        timeout: Option<Duration>,
    }

    #[test]
    fn test_duration_serialization() {
        let original = Test {
            timeout: Some(Duration::from_millis(250)),
        };
        let serialized = serde_json::to_string(&original).unwrap();
        assert_eq!(serialized, r#"{"timeout":0.25}"#);

        let deserialized: Test = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.timeout, original.timeout);
    }

    #[test]
    fn test_null_duration() {
        let deserialized: Test = serde_json::from_str(r#"{"timeout":null}"#).unwrap();
        assert!(deserialized.timeout.is_none());
    }

    #[test]
    fn test_negative_duration_rejected() {
        assert!(serde_json::from_str::<Test>(r#"{"timeout":-1.0}"#).is_err());
    }

    #[test]
    fn test_oversized_duration_rejected() {
        assert!(serde_json::from_str::<Test>(r#"{"timeout":1e20}"#).is_err());
    }
}
