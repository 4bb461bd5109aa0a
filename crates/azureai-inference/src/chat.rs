use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt, future};
use reqwest::{Method, StatusCode};
use secrecy::SecretString;
use url::Url;

use crate::client::{Response, Transport, decode, handle_error};
use crate::error::{InferenceError, Result};
use crate::types::{
    ChatCompletions, ChatCompletionsOptions, ModelInfo, StreamChunk, StreamingChatCompletionsUpdate,
};

/// Sentinel data line that ends a completion stream
const DONE_SENTINEL: &str = "[DONE]";

/// Stream of incremental chat completion updates
pub type UpdateStream = Pin<Box<dyn Stream<Item = Result<StreamingChatCompletionsUpdate>> + Send>>;

/// Streaming chat completion response
///
/// Updates are read from the connection as the stream is polled. Dropping
/// the stream closes the connection.
pub struct StreamingResponse {
    status: StatusCode,
    updates: UpdateStream,
}

impl StreamingResponse {
    /// HTTP status the stream was opened with
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Canonical reason phrase of the status
    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or_default()
    }

    /// Take the update stream
    pub fn into_updates(self) -> UpdateStream {
        self.updates
    }
}

impl std::fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Client for the chat completions and model info routes
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    transport: Transport,
}

impl ChatCompletionsClient {
    /// Create a client for an inference endpoint
    pub fn new(endpoint: Url, api_key: SecretString) -> Self {
        Self {
            transport: Transport::new(endpoint, api_key),
        }
    }

    /// Endpoint this client talks to
    pub const fn endpoint(&self) -> &Url {
        self.transport.endpoint()
    }

    /// Send a chat completion request (non-streaming)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service answers with a
    /// non-success status, or the body cannot be decoded
    pub async fn complete(&self, options: &ChatCompletionsOptions) -> Result<Response<ChatCompletions>> {
        let request = ChatCompletionsOptions {
            stream: false,
            ..options.clone()
        };

        tracing::debug!(
            endpoint = %self.endpoint(),
            messages = request.messages.len(),
            "sending chat completions request"
        );

        let response = self
            .transport
            .request(Method::POST, "chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "chat completions request failed");
                InferenceError::Http(e)
            })?;

        decode(handle_error(response).await?).await
    }

    /// Send a streaming chat completion request
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service answers with a
    /// non-success status. Faults after the stream opened arrive as items
    /// of the stream.
    pub async fn complete_streaming(&self, options: &ChatCompletionsOptions) -> Result<StreamingResponse> {
        let request = ChatCompletionsOptions {
            stream: true,
            ..options.clone()
        };

        tracing::debug!(
            endpoint = %self.endpoint(),
            messages = request.messages.len(),
            "sending streaming chat completions request"
        );

        let response = self
            .transport
            .request(Method::POST, "chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "streaming chat completions request failed");
                InferenceError::Http(e)
            })?;

        let response = handle_error(response).await?;
        let status = response.status();

        let updates = response
            .bytes_stream()
            .eventsource()
            .map(|result| match result {
                Ok(event) => {
                    let data = event.data.trim();
                    if data == DONE_SENTINEL {
                        return StreamStep::Done;
                    }

                    match serde_json::from_str::<StreamChunk>(data) {
                        Ok(chunk) => StreamStep::Update(chunk.into()),
                        Err(e) => {
                            tracing::debug!(error = %e, data = %data, "skipping unparseable SSE chunk");
                            StreamStep::Skip
                        }
                    }
                }
                Err(e) => StreamStep::Failed(InferenceError::Stream(e.to_string())),
            })
            .take_while(|step| future::ready(!matches!(step, StreamStep::Done)))
            .filter_map(|step| {
                future::ready(match step {
                    StreamStep::Update(update) => Some(Ok(update)),
                    StreamStep::Failed(e) => Some(Err(e)),
                    StreamStep::Skip | StreamStep::Done => None,
                })
            });

        Ok(StreamingResponse {
            status,
            updates: Box::pin(updates),
        })
    }

    /// Fetch information about the deployed model
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service answers with a
    /// non-success status, or the body cannot be decoded
    pub async fn get_model_info(&self) -> Result<Response<ModelInfo>> {
        tracing::debug!(endpoint = %self.endpoint(), "requesting model info");

        let response = self
            .transport
            .request(Method::GET, "info")
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "model info request failed");
                InferenceError::Http(e)
            })?;

        decode(handle_error(response).await?).await
    }
}

/// One decoded SSE event
enum StreamStep {
    Update(StreamingChatCompletionsUpdate),
    Failed(InferenceError),
    Skip,
    Done,
}
