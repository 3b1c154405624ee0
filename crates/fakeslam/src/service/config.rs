use crate::{Result, ServiceConfig};
use serde::{Deserialize, Deserializer, Serialize};

/// Attributes of a fake SLAM resource.
///
/// The only recognised attribute is `big`, which selects the large canned map.
/// Unknown attributes are ignored and validation always succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlamConfig {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub big: bool,
}

impl SlamConfig {
    pub const fn new(big: bool) -> Self {
        Self { big }
    }
}

impl ServiceConfig for SlamConfig {
    fn validate(&self, _path: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

// Accepts any JSON value; only `true` selects the large map.
fn lenient_bool<'de, D>(deserializer: D) -> core::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(big) => Ok(big),
        other => {
            tracing::warn!(value = %other, "Ignoring non-boolean `big` attribute");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(attributes: serde_json::Value) -> SlamConfig {
        serde_json::from_value(attributes).unwrap()
    }

    #[test]
    fn big_defaults_to_false() {
        assert_eq!(decode(json!({})), SlamConfig::new(false));
    }

    #[test]
    fn boolean_big_is_used_verbatim() {
        assert_eq!(decode(json!({"big": true})), SlamConfig::new(true));
        assert_eq!(decode(json!({"big": false})), SlamConfig::new(false));
    }

    #[test]
    fn any_other_value_is_accepted_as_false() {
        for value in [json!(null), json!("true"), json!(1), json!([true]), json!({"a": 1})] {
            assert_eq!(decode(json!({"big": value})), SlamConfig::new(false));
        }
    }

    #[test]
    fn unknown_attributes_are_ignored_and_validation_passes() {
        let cfg = decode(json!({"big": true, "sensors": ["lidar"]}));
        assert!(cfg.big);
        assert_eq!(cfg.validate("slam1"), Ok(Vec::new()));
    }
}
