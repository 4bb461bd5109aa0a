use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;

use crate::api::ApiClient;
use crate::user::StatsigUser;

/// Custom event as sent to Statsig
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsigEvent {
    /// Event name, e.g. `invoke`
    pub event_name: String,
    /// User the event is attributed to
    pub user: StatsigUser,
    /// Primary value of the event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Free-form string metadata
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
    /// Unix time in milliseconds
    pub time: i64,
}

/// Message handled by the background logger
pub(crate) enum Command {
    /// Queue an event
    Event(Box<StatsigEvent>),
    /// Send everything queued, then acknowledge
    Flush(oneshot::Sender<()>),
    /// Send everything queued, acknowledge, and stop
    Shutdown(oneshot::Sender<()>),
}

/// Background task that batches events and posts them
///
/// A batch is sent when it reaches `queue_size`, on every tick of
/// `interval`, on an explicit flush, and before the task stops
pub(crate) async fn process_events(
    mut rx: mpsc::UnboundedReceiver<Command>,
    api: ApiClient,
    queue_size: usize,
    interval: Duration,
) {
    let mut queue: Vec<StatsigEvent> = Vec::with_capacity(queue_size);

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Event(event)) => {
                    queue.push(*event);
                    if queue.len() >= queue_size {
                        flush(&api, &mut queue).await;
                    }
                }
                Some(Command::Flush(done)) => {
                    flush(&api, &mut queue).await;
                    let _ = done.send(());
                }
                Some(Command::Shutdown(done)) => {
                    flush(&api, &mut queue).await;
                    let _ = done.send(());
                    break;
                }
                None => {
                    flush(&api, &mut queue).await;
                    break;
                }
            },
            _ = ticker.tick() => flush(&api, &mut queue).await,
        }
    }

    tracing::debug!("statsig event logger shutting down");
}

/// Post the queued events, dropping them if Statsig rejects the batch
async fn flush(api: &ApiClient, queue: &mut Vec<StatsigEvent>) {
    if queue.is_empty() {
        return;
    }

    let events = std::mem::take(queue);

    match api.log_events(&events).await {
        Ok(()) => tracing::debug!(count = events.len(), "flushed statsig events"),
        Err(e) => tracing::warn!(
            error = %e,
            count = events.len(),
            "failed to flush statsig events, batch dropped"
        ),
    }
}
