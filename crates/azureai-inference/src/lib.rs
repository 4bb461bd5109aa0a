#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Thin REST client for Azure AI model inference
//!
//! Covers the chat completions (plain and streaming), model info, and
//! embeddings routes. Requests carry the key in both the `api-key` and
//! `Authorization` headers so serverless and Azure `OpenAI` style
//! deployments accept them.

mod chat;
mod client;
mod embeddings;
pub mod error;
pub mod types;

pub use chat::{ChatCompletionsClient, StreamingResponse, UpdateStream};
pub use client::{API_VERSION, Response};
pub use embeddings::EmbeddingsClient;
pub use error::{InferenceError, Result};
pub use reqwest::StatusCode;
pub use types::*;
