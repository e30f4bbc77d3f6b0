use serde::{Deserialize, Deserializer, Serialize};

use crate::audio::{AudioDevice, matcher};

/// Persisted cycle state.
///
/// `devices` is the user-curated allow-list of names or ids. `last_device_id`
/// is the endpoint the last cycle step switched to, or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, deserialize_with = "null_as_default")]
    pub devices: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub last_device_id: String,
}

// Older versions of the tool wrote `"devices": null` for an empty list
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Config {
    /// Allow-list entries resolved against `available`, in first-match order
    pub fn matching_devices(&self, available: &[AudioDevice]) -> Vec<AudioDevice> {
        matcher::match_devices(available, &self.devices)
    }

    pub fn has_last_device(&self) -> bool {
        !self.last_device_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config = serde_json::from_str(
            r#"{ "devices": ["Speakers", "Headphones"], "last_device_id": "{0.0.0}.{a}" }"#,
        )
        .unwrap();

        assert_eq!(config.devices, vec!["Speakers", "Headphones"]);
        assert_eq!(config.last_device_id, "{0.0.0}.{a}");
        assert!(config.has_last_device());
    }

    #[test]
    fn test_missing_fields_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.has_last_device());
    }

    #[test]
    fn test_null_devices_reads_as_empty() {
        let config: Config =
            serde_json::from_str(r#"{ "devices": null, "last_device_id": "abc" }"#).unwrap();
        assert!(config.devices.is_empty());
        assert_eq!(config.last_device_id, "abc");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let config: Config =
            serde_json::from_str(r#"{ "devices": ["TV"], "theme": "dark" }"#).unwrap();
        assert_eq!(config.devices, vec!["TV"]);
    }
}
