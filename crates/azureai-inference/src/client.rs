use std::fmt;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{InferenceError, Result};

/// REST API version sent with every request
pub const API_VERSION: &str = "2024-05-01-preview";

/// Decoded response together with the HTTP status it arrived with
#[derive(Debug, Clone)]
pub struct Response<T> {
    status: StatusCode,
    value: T,
}

impl<T> Response<T> {
    pub(crate) const fn new(status: StatusCode, value: T) -> Self {
        Self { status, value }
    }

    /// HTTP status of the response
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Canonical reason phrase of the status
    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or_default()
    }

    /// Borrow the decoded value
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Take the decoded value
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Shared HTTP plumbing for the chat and embeddings clients
#[derive(Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    endpoint: Url,
    api_key: SecretString,
}

impl Transport {
    pub(crate) fn new(endpoint: Url, api_key: SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }

    pub(crate) const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the URL for a route below the endpoint
    ///
    /// The endpoint may carry a path prefix such as `/models`, which is kept
    fn url(&self, route: &str) -> Url {
        let mut url = self.endpoint.clone();
        let path = format!("{}/{route}", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        url
    }

    /// Build an authenticated request
    pub(crate) fn request(&self, method: Method, route: &str) -> reqwest::RequestBuilder {
        let key = self.api_key.expose_secret();

        self.http
            .request(method, self.url(route))
            .header("api-key", key)
            .bearer_auth(key)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Check an HTTP response for errors
pub(crate) async fn handle_error(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = parse_error_body(&body);

    tracing::warn!(status = %status, "inference service returned error");

    Err(InferenceError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Decode a successful response body
pub(crate) async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<Response<T>> {
    let status = response.status();
    let value = response
        .json()
        .await
        .map_err(|e| InferenceError::Parse(e.to_string()))?;

    Ok(Response::new(status, value))
}

/// Pull the human-readable message out of an error body
///
/// The service wraps errors as `{"error": {"code": ..., "message": ...}}`;
/// anything else is returned verbatim
fn parse_error_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_owned))
        .unwrap_or_else(|| body.to_owned())
}
