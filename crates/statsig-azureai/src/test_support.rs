//! Mock Statsig wiring shared by the unit tests

use secrecy::SecretString;
use statsig_client::{StatsigOptions, StatsigServer};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Initialize a Statsig client that posts events to `telemetry`
pub(crate) async fn statsig(telemetry: &MockServer) -> StatsigServer {
    Mock::given(method("POST"))
        .and(path("/v1/log_event"))
        .respond_with(ResponseTemplate::new(202))
        .mount(telemetry)
        .await;

    let options = StatsigOptions {
        api: Url::parse(&format!("{}/v1/", telemetry.uri())).unwrap(),
        ..StatsigOptions::default()
    };

    StatsigServer::initialize(SecretString::from("secret-test".to_owned()), options)
        .await
        .unwrap()
}

/// Every event received by `telemetry`, in arrival order
pub(crate) async fn logged_events(telemetry: &MockServer) -> Vec<serde_json::Value> {
    telemetry
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| request.url.path() == "/v1/log_event")
        .flat_map(|request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            body["events"].as_array().cloned().unwrap_or_default()
        })
        .collect()
}

/// `(eventName, value)` pairs of the logged events
pub(crate) async fn event_names(telemetry: &MockServer) -> Vec<(String, String)> {
    logged_events(telemetry)
        .await
        .iter()
        .map(|event| {
            (
                event["eventName"].as_str().unwrap_or_default().to_owned(),
                event["value"].as_str().unwrap_or_default().to_owned(),
            )
        })
        .collect()
}
