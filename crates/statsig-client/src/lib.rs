#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

//! Thin client for the Statsig server HTTP API
//!
//! Events are queued without blocking and posted in batches by a background
//! task; dynamic configs are evaluated remotely on request.

mod api;
pub mod config;
pub mod error;
mod logger;
pub mod options;
mod server;
pub mod user;

pub use config::DynamicConfig;
pub use error::StatsigError;
pub use logger::StatsigEvent;
pub use options::StatsigOptions;
pub use server::StatsigServer;
pub use user::StatsigUser;
