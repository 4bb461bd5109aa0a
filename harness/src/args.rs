use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

use crate::logging::LogFormat;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Exercise an Azure AI deployment while reporting to Statsig
///
/// Reads `STATSIG_SERVER_KEY`, `DEPLOYMENT_ENDPOINT_URL` and
/// `DEPLOYMENT_KEY` from the env file, falling back to the environment.
#[derive(Debug, Parser)]
#[command(name = "azureai-harness", version)]
pub struct Args {
    /// File with `KEY=VALUE` lines [default: .env.local]
    #[arg(long, env = "AZUREAI_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Log filter directives
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_filter: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Override the Statsig API base URL
    #[arg(long, env = "STATSIG_API")]
    pub statsig_api: Option<Url>,

    /// Environment tier attached to every event
    #[arg(long, env = "STATSIG_ENVIRONMENT_TIER")]
    pub environment_tier: Option<String>,

    /// User id the calls are attributed to
    #[arg(long)]
    pub user_id: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Complete a prompt against the configured deployment
    Complete {
        message: String,
        #[arg(long, default_value = DEFAULT_SYSTEM_PROMPT)]
        system: String,
    },
    /// Complete a prompt using connection settings from a dynamic config
    CompleteConfig {
        config_id: String,
        message: String,
        #[arg(long, default_value = DEFAULT_SYSTEM_PROMPT)]
        system: String,
    },
    /// Stream the completion of a prompt
    Stream {
        message: String,
        #[arg(long, default_value = DEFAULT_SYSTEM_PROMPT)]
        system: String,
    },
    /// Show the deployed model
    Info,
    /// Embed one or more texts and print the vector sizes
    Embed {
        #[arg(required = true)]
        inputs: Vec<String>,
    },
}
