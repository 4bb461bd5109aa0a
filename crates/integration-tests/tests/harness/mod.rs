#![allow(dead_code)]

pub mod mock_inference;
pub mod mock_statsig;

use secrecy::SecretString;
use statsig_azureai::{Server, StatsigOptions};
use url::Url;

use mock_statsig::MockStatsig;

/// Flush interval long enough that only shutdown delivers events
const FLUSH_INTERVAL: &str = "1h";

/// Start a [`Server`] that reports to `statsig`
pub async fn server(statsig: &MockStatsig) -> anyhow::Result<Server> {
    let options = StatsigOptions {
        api: Url::parse(&statsig.api_url())?,
        flush_interval: FLUSH_INTERVAL.to_owned(),
        ..StatsigOptions::default()
    };

    Ok(Server::initialize(SecretString::from(mock_statsig::SERVER_KEY.to_owned()), options).await?)
}
