use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identity that events and config evaluations are attributed to
///
/// Serializes to the camelCase shape the Statsig API expects
/// (`userID`, `customIDs`, `statsigEnvironment`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsigUser {
    /// Primary user identifier
    #[serde(rename = "userID", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// IP address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// User agent string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Two-letter country code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Locale, e.g. `en_US`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Version of the calling application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    /// Arbitrary custom fields
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom: HashMap<String, serde_json::Value>,
    /// Fields used for evaluation but never logged with events
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub private_attributes: HashMap<String, serde_json::Value>,
    /// Secondary identifiers keyed by id type
    #[serde(rename = "customIDs", default, skip_serializing_if = "HashMap::is_empty")]
    pub custom_ids: HashMap<String, String>,
    /// Environment the user belongs to, e.g. `{"tier": "staging"}`
    #[serde(
        rename = "statsigEnvironment",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub environment: Option<HashMap<String, String>>,
}

impl StatsigUser {
    /// Create a user with a primary identifier
    pub fn with_user_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    /// Set a custom identifier, replacing any previous value for the type
    pub fn add_custom_id(&mut self, id_type: impl Into<String>, id: impl Into<String>) {
        self.custom_ids.insert(id_type.into(), id.into());
    }

    /// Copy of the user safe to attach to logged events
    pub(crate) fn without_private_attributes(&self) -> Self {
        Self {
            private_attributes: HashMap::new(),
            ..self.clone()
        }
    }

    /// Fill in the environment tier unless the user already carries one
    pub(crate) fn with_default_environment(mut self, tier: Option<&str>) -> Self {
        if self.environment.is_none()
            && let Some(tier) = tier
        {
            self.environment = Some(HashMap::from([("tier".to_owned(), tier.to_owned())]));
        }
        self
    }
}
