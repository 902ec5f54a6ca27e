//! Shared serde helpers for configuration types

/// Serialize a `Duration` as whole seconds.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct Config {
///     #[serde(with = "av_core::config::serde_utils::duration_secs")]
///     interval: Duration,
/// }
/// ```
pub mod duration_secs {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Interval {
        #[serde(with = "duration_secs")]
        every: Duration,
    }

    #[test]
    fn test_sub_second_precision_is_dropped() {
        let value = Interval {
            every: Duration::from_millis(2500),
        };
        let text = toml::to_string(&value).unwrap();
        assert_eq!(text.trim(), "every = 2");
    }

    #[test]
    fn test_reads_integer_seconds() {
        let value: Interval = toml::from_str("every = 86400").unwrap();
        assert_eq!(value.every, Duration::from_secs(24 * 60 * 60));
    }
}
