use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Dynamic config as evaluated by Statsig for one user
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DynamicConfig {
    /// Config name
    #[serde(default)]
    pub name: String,
    /// Evaluated JSON object
    #[serde(default)]
    pub value: serde_json::Value,
    /// Rule that matched the user
    #[serde(default)]
    pub rule_id: String,
    /// Name of the matched group, if any
    #[serde(default)]
    pub group: Option<String>,
}

impl DynamicConfig {
    /// An empty config, returned when evaluation is unavailable
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Read a typed field, falling back to `default` when the field is
    /// missing or has a different type
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_opt(key).unwrap_or(default)
    }

    /// Read a typed field if present and well-typed
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.value
            .get(key)
            .filter(|value| !value.is_null())
            .and_then(|value| T::deserialize(value).ok())
    }
}
