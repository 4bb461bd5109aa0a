use reqwest::Method;
use secrecy::SecretString;
use url::Url;

use crate::client::{Response, Transport, decode, handle_error};
use crate::error::{InferenceError, Result};
use crate::types::{EmbeddingsOptions, EmbeddingsResult};

/// Client for the embeddings route
#[derive(Debug, Clone)]
pub struct EmbeddingsClient {
    transport: Transport,
}

impl EmbeddingsClient {
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

    /// Generate embeddings for text input
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service answers with a
    /// non-success status, or the body cannot be decoded
    pub async fn embed(&self, options: &EmbeddingsOptions) -> Result<Response<EmbeddingsResult>> {
        tracing::debug!(
            endpoint = %self.endpoint(),
            inputs = options.input.len(),
            "sending embeddings request"
        );

        let response = self
            .transport
            .request(Method::POST, "embeddings")
            .json(options)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "embeddings request failed");
                InferenceError::Http(e)
            })?;

        let response = decode(handle_error(response).await?).await?;

        tracing::debug!("embeddings request complete");

        Ok(response)
    }
}
