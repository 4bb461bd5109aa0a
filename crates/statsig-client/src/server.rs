use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{mpsc, oneshot};

use crate::api::ApiClient;
use crate::config::DynamicConfig;
use crate::error::StatsigError;
use crate::logger::{Command, StatsigEvent, process_events};
use crate::options::StatsigOptions;
use crate::user::StatsigUser;

/// Prefix every server secret key carries
const SERVER_KEY_PREFIX: &str = "secret-";

/// Handle to an initialized Statsig client
///
/// Cheap to clone; all clones share one background event logger. The
/// logger runs until [`StatsigServer::shutdown`] is called or every clone
/// is dropped.
#[derive(Clone)]
pub struct StatsigServer {
    api: ApiClient,
    tx: mpsc::UnboundedSender<Command>,
    environment_tier: Option<String>,
}

impl StatsigServer {
    /// Validate the key, build the HTTP client and start the event logger
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a server secret key, the options
    /// are invalid, or the HTTP client cannot be built
    pub async fn initialize(server_key: SecretString, options: StatsigOptions) -> Result<Self, StatsigError> {
        if !server_key.expose_secret().starts_with(SERVER_KEY_PREFIX) {
            return Err(StatsigError::InvalidSdkKey);
        }

        let interval = options.flush_interval()?;
        if options.event_queue_size == 0 {
            return Err(StatsigError::Options("event_queue_size must be greater than 0".to_owned()));
        }

        let api = ApiClient::new(options.api.clone(), server_key, options.local_mode)?;

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(process_events(rx, api.clone(), options.event_queue_size, interval));

        tracing::info!(
            api = %options.api,
            local_mode = options.local_mode,
            "statsig initialized"
        );

        Ok(Self {
            api,
            tx,
            environment_tier: options.environment_tier,
        })
    }

    /// Queue a custom event for background delivery
    ///
    /// Never blocks. After shutdown the event is dropped with a warning.
    pub fn log_event(
        &self,
        user: &StatsigUser,
        event_name: &str,
        value: Option<&str>,
        metadata: HashMap<String, String>,
    ) {
        let event = StatsigEvent {
            event_name: event_name.to_owned(),
            user: user
                .without_private_attributes()
                .with_default_environment(self.environment_tier.as_deref()),
            value: value.map(str::to_owned),
            metadata,
            time: jiff::Timestamp::now().as_millisecond(),
        };

        if self.tx.send(Command::Event(Box::new(event))).is_err() {
            tracing::warn!(event_name, "failed to enqueue statsig event, logger stopped");
        }
    }

    /// Evaluate a dynamic config for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Statsig returns an error
    pub async fn get_config(&self, user: &StatsigUser, config_name: &str) -> Result<DynamicConfig, StatsigError> {
        let user = user
            .clone()
            .with_default_environment(self.environment_tier.as_deref());

        tracing::debug!(config_name, "fetching dynamic config");

        self.api.get_config(&user, config_name).await
    }

    /// Send every queued event and wait until the batch was posted
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Flush queued events and stop the event logger
    ///
    /// Calling this more than once is harmless.
    pub async fn shutdown(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Shutdown(done_tx)).is_ok() {
            let _ = done_rx.await;
            tracing::info!("statsig shut down");
        }
    }
}

impl std::fmt::Debug for StatsigServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsigServer")
            .field("api", &self.api)
            .field("environment_tier", &self.environment_tier)
            .finish_non_exhaustive()
    }
}
