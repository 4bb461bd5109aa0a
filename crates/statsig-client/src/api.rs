use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use url::Url;

use crate::config::DynamicConfig;
use crate::error::StatsigError;
use crate::logger::StatsigEvent;
use crate::user::StatsigUser;

/// SDK type reported to Statsig
pub(crate) const SDK_TYPE: &str = "statsig-client-rust";

/// SDK version reported to Statsig
pub(crate) const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsigMetadata {
    sdk_type: &'static str,
    sdk_version: &'static str,
}

const METADATA: StatsigMetadata = StatsigMetadata {
    sdk_type: SDK_TYPE,
    sdk_version: SDK_VERSION,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogEventRequest<'a> {
    events: &'a [StatsigEvent],
    statsig_metadata: StatsigMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetConfigRequest<'a> {
    user: &'a StatsigUser,
    config_name: &'a str,
    statsig_metadata: StatsigMetadata,
}

/// Async HTTP client for the Statsig server API
#[derive(Clone)]
pub(crate) struct ApiClient {
    http: reqwest::Client,
    api: Url,
    server_key: SecretString,
    local_mode: bool,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub(crate) fn new(api: Url, server_key: SecretString, local_mode: bool) -> Result<Self, StatsigError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(StatsigError::Request)?;

        Ok(Self {
            http,
            api,
            server_key,
            local_mode,
        })
    }

    /// Build an authenticated POST request for a route below the API base
    fn post(&self, route: &str) -> Result<RequestBuilder, StatsigError> {
        let url = self.api.join(route).map_err(|e| StatsigError::Api {
            status: 0,
            message: format!("invalid URL: {e}"),
        })?;

        Ok(self
            .http
            .post(url)
            .header("statsig-api-key", self.server_key.expose_secret())
            .header("STATSIG-CLIENT-TIME", jiff::Timestamp::now().as_millisecond().to_string())
            .header("STATSIG-SDK-TYPE", SDK_TYPE)
            .header("STATSIG-SDK-VERSION", SDK_VERSION))
    }

    /// Send a batch of events
    ///
    /// POST `/log_event`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or Statsig returns an error
    pub(crate) async fn log_events(&self, events: &[StatsigEvent]) -> Result<(), StatsigError> {
        if self.local_mode || events.is_empty() {
            return Ok(());
        }

        let body = LogEventRequest {
            events,
            statsig_metadata: METADATA,
        };

        let response = self.post("log_event")?.json(&body).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(StatsigError::Api { status, message })
        }
    }

    /// Evaluate a dynamic config for a user
    ///
    /// POST `/get_config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or Statsig returns an error
    pub(crate) async fn get_config(&self, user: &StatsigUser, name: &str) -> Result<DynamicConfig, StatsigError> {
        if self.local_mode {
            return Ok(DynamicConfig::empty(name));
        }

        let body = GetConfigRequest {
            user,
            config_name: name,
            statsig_metadata: METADATA,
        };

        let response = self.post("get_config")?.json(&body).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(StatsigError::Api { status, message })
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api", &self.api)
            .field("local_mode", &self.local_mode)
            .finish_non_exhaustive()
    }
}
