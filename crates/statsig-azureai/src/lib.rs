#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Azure AI inference with Statsig telemetry
//!
//! A [`Server`] owns the Statsig client and hands out [`ModelClient`]s,
//! either for an explicit endpoint or from a dynamic config. Every model
//! call logs an `invoke` event before it starts and a `usage` event with
//! token counts and latency once it succeeds.

mod client;
pub mod error;
pub mod options;
mod server;
mod telemetry;
#[cfg(test)]
mod test_support;
pub mod utils;

pub use azureai_inference::{
    ChatRequestMessage, EmbeddingsResult, InferenceError, ModelInfo, ModelType, StreamingChatCompletionsUpdate,
    UpdateStream,
};
pub use client::ModelClient;
pub use error::{Error, Result};
pub use server::Server;
pub use statsig_client::{DynamicConfig, StatsigError, StatsigOptions, StatsigUser};
pub use telemetry::{INVOKE_EVENT, USAGE_EVENT};
