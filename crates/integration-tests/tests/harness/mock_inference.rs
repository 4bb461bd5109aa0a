//! Mock Azure AI inference endpoint
//!
//! Serves chat completions (plain and SSE), model info and embeddings under
//! `/models`, answering only requests that carry the expected key

use std::collections::HashMap;
use std::fmt::Write;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Key the mock accepts
pub const API_KEY: &str = "deployment-key";

const API_VERSION: &str = "2024-05-01-preview";
const MODEL: &str = "mock-model";
const REPLY: &str = "Hello from mock inference";

pub struct MockInference {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockInferenceState>,
}

struct MockInferenceState {
    request_count: AtomicU32,
    /// Status returned instead of a normal reply, if set
    status: Option<StatusCode>,
    last_chat_request: Mutex<Option<serde_json::Value>>,
}

impl MockInference {
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(None).await
    }

    /// Start a mock answering every request with `status` and an error body
    pub async fn start_with_status(status: StatusCode) -> anyhow::Result<Self> {
        Self::start_inner(Some(status)).await
    }

    async fn start_inner(status: Option<StatusCode>) -> anyhow::Result<Self> {
        let state = Arc::new(MockInferenceState {
            request_count: AtomicU32::new(0),
            status,
            last_chat_request: Mutex::new(None),
        });

        let app = Router::new()
            .route("/models/chat/completions", routing::post(handle_chat_completions))
            .route("/models/info", routing::get(handle_info))
            .route("/models/embeddings", routing::post(handle_embeddings))
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

    /// Endpoint URL, including the `/models` prefix
    pub fn endpoint(&self) -> String {
        format!("http://{}/models", self.addr)
    }

    /// Number of requests that reached a handler
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Body of the most recent chat completions request
    pub fn last_chat_request(&self) -> Option<serde_json::Value> {
        self.state.last_chat_request.lock().unwrap().clone()
    }
}

impl Drop for MockInference {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Request checks --

/// Reject requests without the API version or key
fn check(state: &MockInferenceState, headers: &HeaderMap, query: &HashMap<String, String>) -> Option<axum::response::Response> {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    if query.get("api-version").map(String::as_str) != Some(API_VERSION) {
        return Some(error(StatusCode::BAD_REQUEST, "missing api-version"));
    }

    let bearer = format!("Bearer {API_KEY}");
    let key_ok = headers.get("api-key").is_some_and(|key| key == API_KEY)
        && headers
            .get(header::AUTHORIZATION)
            .is_some_and(|value| value == bearer.as_str());
    if !key_ok {
        return Some(error(StatusCode::UNAUTHORIZED, "invalid key"));
    }

    state
        .status
        .map(|status| error(status, "mock inference configured to fail"))
}

fn error(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(serde_json::json!({"error": {"code": status.as_u16().to_string(), "message": message}})),
    )
        .into_response()
}

// -- Handlers --

#[derive(Debug, Deserialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    #[serde(default)]
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[allow(dead_code)]
    role: String,
    content: String,
}

async fn handle_chat_completions(
    State(state): State<Arc<MockInferenceState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    if let Some(rejection) = check(&state, &headers, &query) {
        return rejection;
    }

    *state.last_chat_request.lock().unwrap() = Some(body.clone());

    let Ok(req) = serde_json::from_value::<ChatRequest>(body) else {
        return error(StatusCode::BAD_REQUEST, "malformed chat request");
    };

    if req.stream {
        return streaming_response();
    }

    let prompt_tokens = req
        .messages
        .iter()
        .map(|message| message.content.split_whitespace().count())
        .sum::<usize>();

    Json(serde_json::json!({
        "id": "cmpl-mock-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": MODEL,
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": {"role": "assistant", "content": REPLY}
        }],
        "usage": {
            "completion_tokens": 4,
            "prompt_tokens": prompt_tokens,
            "total_tokens": prompt_tokens + 4
        }
    }))
    .into_response()
}

/// One SSE chunk per word of the reply, then `[DONE]`
fn streaming_response() -> axum::response::Response {
    let mut body = String::new();

    for (index, word) in REPLY.split_inclusive(' ').enumerate() {
        let delta = if index == 0 {
            serde_json::json!({"role": "assistant", "content": word})
        } else {
            serde_json::json!({"content": word})
        };
        let chunk = serde_json::json!({
            "id": "cmpl-mock-stream",
            "created": 1_700_000_000,
            "model": MODEL,
            "choices": [{"index": 0, "delta": delta, "finish_reason": null}]
        });
        let _ = write!(body, "data: {chunk}\n\n");
    }

    let last = serde_json::json!({
        "id": "cmpl-mock-stream",
        "created": 1_700_000_000,
        "model": MODEL,
        "choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}],
        "usage": {"completion_tokens": 4, "prompt_tokens": 3, "total_tokens": 7}
    });
    let _ = write!(body, "data: {last}\n\n");
    body.push_str("data: [DONE]\n\n");

    ([(header::CONTENT_TYPE, "text/event-stream")], body).into_response()
}

async fn handle_info(
    State(state): State<Arc<MockInferenceState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> axum::response::Response {
    if let Some(rejection) = check(&state, &headers, &query) {
        return rejection;
    }

    Json(serde_json::json!({
        "model_name": MODEL,
        "model_type": "chat-completion",
        "model_provider_name": "Mock Provider"
    }))
    .into_response()
}

#[derive(Debug, Deserialize)]
struct EmbeddingsRequest {
    input: Vec<String>,
}

async fn handle_embeddings(
    State(state): State<Arc<MockInferenceState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(req): Json<EmbeddingsRequest>,
) -> axum::response::Response {
    if let Some(rejection) = check(&state, &headers, &query) {
        return rejection;
    }

    // Reverse order so clients must sort by index
    #[allow(clippy::cast_precision_loss)]
    let data: Vec<serde_json::Value> = req
        .input
        .iter()
        .enumerate()
        .rev()
        .map(|(index, text)| {
            serde_json::json!({
                "index": index,
                "embedding": [text.len() as f32, index as f32, 1.0]
            })
        })
        .collect();

    let tokens = req.input.len();
    Json(serde_json::json!({
        "id": "emb-mock-1",
        "model": "mock-embedding",
        "data": data,
        "usage": {"prompt_tokens": tokens, "total_tokens": tokens}
    }))
    .into_response()
}
