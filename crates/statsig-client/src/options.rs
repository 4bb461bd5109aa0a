use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::StatsigError;

/// Default Statsig API base URL
const DEFAULT_API: &str = "https://statsigapi.net/v1/";

/// Options for [`StatsigServer::initialize`](crate::StatsigServer::initialize)
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsigOptions {
    /// Base URL of the Statsig API, ending in `/`
    #[serde(default = "default_api")]
    pub api: Url,
    /// Environment tier attached to users that carry none (e.g. `staging`)
    #[serde(default)]
    pub environment_tier: Option<String>,
    /// How often queued events are flushed, as a duration string (`"60s"`)
    #[serde(default = "default_flush_interval")]
    pub flush_interval: String,
    /// Number of queued events that triggers an early flush
    #[serde(default = "default_event_queue_size")]
    pub event_queue_size: usize,
    /// Skip all network traffic: events are dropped and configs are empty
    #[serde(default)]
    pub local_mode: bool,
}

impl Default for StatsigOptions {
    fn default() -> Self {
        Self {
            api: default_api(),
            environment_tier: None,
            flush_interval: default_flush_interval(),
            event_queue_size: default_event_queue_size(),
            local_mode: false,
        }
    }
}

impl StatsigOptions {
    /// Parsed flush interval
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is not a valid, non-zero duration
    pub fn flush_interval(&self) -> Result<Duration, StatsigError> {
        let interval = duration_str::parse(&self.flush_interval).map_err(|e| {
            StatsigError::Options(format!("invalid flush interval '{}': {e}", self.flush_interval))
        })?;

        if interval.is_zero() {
            return Err(StatsigError::Options("flush interval must be greater than 0".to_owned()));
        }

        Ok(interval)
    }
}

fn default_api() -> Url {
    // DEFAULT_API is a constant absolute URL, so parsing cannot fail
    Url::parse(DEFAULT_API).expect("valid default URL")
}

fn default_flush_interval() -> String {
    "60s".to_owned()
}

const fn default_event_queue_size() -> usize {
    500
}
