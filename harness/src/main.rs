#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod dotenv;
mod logging;

use std::io::Write;

use anyhow::Context;
use args::{Args, Command};
use clap::Parser;
use dotenv::DotEnv;
use futures_util::TryStreamExt;
use secrecy::SecretString;
use statsig_azureai::{ModelClient, Server, StatsigOptions, StatsigUser};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init(&args.log_filter, args.log_format);

    let mut env = match &args.env_file {
        Some(path) => DotEnv::load_from(path),
        None => DotEnv::load(),
    }
    .context("failed to read env file")?;

    let server_key = env.get("STATSIG_SERVER_KEY");
    anyhow::ensure!(!server_key.is_empty(), "STATSIG_SERVER_KEY is not set");

    let mut options = StatsigOptions {
        environment_tier: args.environment_tier,
        ..StatsigOptions::default()
    };
    if let Some(api) = args.statsig_api {
        options.api = api;
    }

    let server = Server::initialize(SecretString::from(server_key), options).await?;
    let user = args.user_id.map(StatsigUser::with_user_id);

    let result = run(&server, args.command, &mut env, user.as_ref()).await;

    // Deliver the events of failed calls too
    server.shutdown().await;

    result
}

async fn run(server: &Server, command: Command, env: &mut DotEnv, user: Option<&StatsigUser>) -> anyhow::Result<()> {
    match command {
        Command::Complete { message, system } => {
            let client = deployment_client(server, env)?;
            let reply = client.complete_prompt(&system, &message, user).await?;
            println!("{reply}");
        }
        Command::CompleteConfig {
            config_id,
            message,
            system,
        } => {
            let endpoint = env.get("DEPLOYMENT_ENDPOINT_URL");
            let api_key = env.get("DEPLOYMENT_KEY");
            let client = server
                .model_client(&config_id, Some(&endpoint), Some(&api_key))
                .await?;
            let reply = client.complete_prompt(&system, &message, user).await?;
            println!("{reply}");
        }
        Command::Stream { message, system } => {
            let client = deployment_client(server, env)?;
            let mut updates = client.stream_complete_prompt(&system, &message, user).await?;

            let mut stdout = std::io::stdout().lock();
            while let Some(update) = updates.try_next().await? {
                if let Some(content) = update.content_update {
                    write!(stdout, "{content}")?;
                    stdout.flush()?;
                }
            }
            writeln!(stdout)?;
        }
        Command::Info => {
            let client = deployment_client(server, env)?;
            let info = client.get_model_info(user).await?;
            println!(
                "{} ({}) by {}",
                info.model_name, info.model_type, info.model_provider_name
            );
        }
        Command::Embed { inputs } => {
            let client = deployment_client(server, env)?;
            let vectors = client.get_embeddings(inputs.iter().cloned(), user).await?;
            for (input, vector) in inputs.iter().zip(&vectors) {
                println!("{input}: {} dimensions", vector.len());
            }
        }
    }

    Ok(())
}

fn deployment_client(server: &Server, env: &mut DotEnv) -> anyhow::Result<ModelClient> {
    let endpoint = env.get("DEPLOYMENT_ENDPOINT_URL");
    let api_key = env.get("DEPLOYMENT_KEY");
    anyhow::ensure!(
        !endpoint.is_empty() && !api_key.is_empty(),
        "DEPLOYMENT_ENDPOINT_URL and DEPLOYMENT_KEY must be set"
    );

    Ok(server.model_client_from_endpoint(&endpoint, SecretString::from(api_key))?)
}
