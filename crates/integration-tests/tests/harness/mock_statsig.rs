//! Mock Statsig API recording logged events and serving dynamic configs

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Server key the mock accepts
pub const SERVER_KEY: &str = "secret-integration";

pub struct MockStatsig {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockStatsigState>,
}

#[derive(Default)]
struct MockStatsigState {
    events: Mutex<Vec<serde_json::Value>>,
    configs: HashMap<String, serde_json::Value>,
    fail_configs: bool,
}

impl MockStatsig {
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(MockStatsigState::default()).await
    }

    /// Start a mock serving the given config values by name
    pub async fn start_with_configs(configs: HashMap<String, serde_json::Value>) -> anyhow::Result<Self> {
        Self::start_inner(MockStatsigState {
            configs,
            ..MockStatsigState::default()
        })
        .await
    }

    /// Start a mock whose config evaluation always fails
    pub async fn start_failing_configs() -> anyhow::Result<Self> {
        Self::start_inner(MockStatsigState {
            fail_configs: true,
            ..MockStatsigState::default()
        })
        .await
    }

    async fn start_inner(state: MockStatsigState) -> anyhow::Result<Self> {
        let state = Arc::new(state);

        let app = Router::new()
            .route("/v1/log_event", routing::post(handle_log_event))
            .route("/v1/get_config", routing::post(handle_get_config))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// API base URL, ending in `/`
    pub fn api_url(&self) -> String {
        format!("http://{}/v1/", self.addr)
    }

    /// Events received so far, in arrival order
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.state.events.lock().unwrap().clone()
    }

    /// `(eventName, value)` of every received event
    pub fn event_names(&self) -> Vec<(String, String)> {
        self.events()
            .iter()
            .map(|event| {
                (
                    event["eventName"].as_str().unwrap_or_default().to_owned(),
                    event["value"].as_str().unwrap_or_default().to_owned(),
                )
            })
            .collect()
    }
}

impl Drop for MockStatsig {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("statsig-api-key")
        .is_some_and(|key| key == SERVER_KEY)
}

#[derive(Debug, Deserialize)]
struct LogEventRequest {
    events: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetConfigRequest {
    config_name: String,
}

async fn handle_log_event(
    State(state): State<Arc<MockStatsigState>>,
    headers: HeaderMap,
    Json(req): Json<LogEventRequest>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    state.events.lock().unwrap().extend(req.events);
    (StatusCode::ACCEPTED, Json(serde_json::json!({"success": true}))).into_response()
}

async fn handle_get_config(
    State(state): State<Arc<MockStatsigState>>,
    headers: HeaderMap,
    Json(req): Json<GetConfigRequest>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if state.fail_configs {
        return (StatusCode::INTERNAL_SERVER_ERROR, "evaluation unavailable").into_response();
    }

    let value = state
        .configs
        .get(&req.config_name)
        .cloned()
        .unwrap_or_else(|| serde_json::json!({}));

    Json(serde_json::json!({
        "name": req.config_name,
        "value": value,
        "rule_id": "default",
        "group": null
    }))
    .into_response()
}
