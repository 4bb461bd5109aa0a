use std::collections::HashMap;

use secrecy::SecretString;
use serde_json::Value;
use statsig_client::{DynamicConfig, StatsigOptions, StatsigServer};

use crate::client::ModelClient;
use crate::error::{Error, Result};
use crate::utils::statsig_user;

const ENDPOINT_FIELD: &str = "endpoint";
const KEY_FIELD: &str = "key";
const DEFAULTS_FIELD: &str = "completion_defaults";

/// Entry point tying a Statsig client to the model clients it creates
///
/// Every [`ModelClient`] built here logs through the same Statsig client.
#[derive(Debug, Clone)]
pub struct Server {
    statsig: StatsigServer,
}

impl Server {
    /// Initialize Statsig with a server secret key
    pub async fn initialize(server_key: SecretString, options: StatsigOptions) -> Result<Self> {
        let statsig = StatsigServer::initialize(server_key, options).await?;
        Ok(Self::from_statsig(statsig))
    }

    /// Wrap an already initialized Statsig client
    pub const fn from_statsig(statsig: StatsigServer) -> Self {
        Self { statsig }
    }

    pub const fn statsig(&self) -> &StatsigServer {
        &self.statsig
    }

    /// Build a model client from a dynamic config
    ///
    /// The config may carry `endpoint`, `key` and a `completion_defaults`
    /// map whose string, number or boolean values become option defaults.
    /// Missing fields fall back to the given defaults. A config that cannot
    /// be fetched is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no endpoint or key can be resolved, or
    /// an error if the endpoint is not a valid URL
    pub async fn model_client(
        &self,
        config_id: &str,
        default_endpoint: Option<&str>,
        default_api_key: Option<&str>,
    ) -> Result<ModelClient> {
        let user = statsig_user(None);
        let config = match self.statsig.get_config(&user, config_id).await {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(config_id, error = %error, "failed to fetch model config, using defaults");
                DynamicConfig::empty(config_id)
            }
        };

        let endpoint = config
            .get_opt::<String>(ENDPOINT_FIELD)
            .or_else(|| default_endpoint.map(str::to_owned))
            .unwrap_or_default();
        let api_key = config
            .get_opt::<String>(KEY_FIELD)
            .or_else(|| default_api_key.map(str::to_owned))
            .unwrap_or_default();

        if endpoint.is_empty() || api_key.is_empty() {
            return Err(Error::Config(
                "Endpoint and API key are not specified in the config".to_owned(),
            ));
        }

        let defaults = completion_defaults(&config);

        tracing::debug!(
            config_id,
            endpoint = %endpoint,
            defaults = defaults.len(),
            "creating model client from config"
        );

        ModelClient::new(
            self.statsig.clone(),
            &endpoint,
            SecretString::from(api_key),
            Some(defaults),
        )
    }

    /// Build a model client for an explicit endpoint and key
    pub fn model_client_from_endpoint(&self, endpoint: &str, api_key: SecretString) -> Result<ModelClient> {
        ModelClient::new(self.statsig.clone(), endpoint, api_key, None)
    }

    /// Flush pending events and stop the Statsig client
    pub async fn shutdown(&self) {
        self.statsig.shutdown().await;
    }
}

/// String view of the `completion_defaults` map
///
/// Numbers and booleans are kept in their text form; other values are
/// skipped one key at a time.
fn completion_defaults(config: &DynamicConfig) -> HashMap<String, String> {
    let Some(fields) = config.get_opt::<serde_json::Map<String, Value>>(DEFAULTS_FIELD) else {
        return HashMap::new();
    };

    fields
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(text) => Some((key, text)),
            Value::Number(number) => Some((key, number.to_string())),
            Value::Bool(flag) => Some((key, flag.to_string())),
            other => {
                tracing::debug!(key = %key, value = %other, "ignoring non-scalar completion default");
                None
            }
        })
        .collect()
}
