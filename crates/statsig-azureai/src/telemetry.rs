//! `invoke` and `usage` events logged around every remote call

use std::collections::HashMap;
use std::time::Instant;

use statsig_client::{StatsigServer, StatsigUser};

use crate::utils::{SDK_TYPE, SDK_TYPE_KEY, statsig_user};

/// Event logged before each remote call
pub const INVOKE_EVENT: &str = "invoke";

/// Event logged after each successful remote call
pub const USAGE_EVENT: &str = "usage";

/// Start of one call, used to report its latency
#[derive(Debug, Clone, Copy)]
pub(crate) struct InvokeContext {
    started: Instant,
}

impl InvokeContext {
    fn elapsed_ms(self) -> u128 {
        self.started.elapsed().as_millis()
    }
}

/// Log the `invoke` event for `method` and start timing the call
pub(crate) fn log_invoke(statsig: &StatsigServer, user: Option<&StatsigUser>, method: &str) -> InvokeContext {
    let user = statsig_user(user.cloned());
    let metadata = HashMap::from([(SDK_TYPE_KEY.to_owned(), SDK_TYPE.to_owned())]);

    statsig.log_event(&user, INVOKE_EVENT, Some(method), metadata);

    InvokeContext {
        started: Instant::now(),
    }
}

/// Log the `usage` event for `method`
pub(crate) fn log_usage(
    statsig: &StatsigServer,
    user: Option<&StatsigUser>,
    method: &str,
    usage: Option<HashMap<String, String>>,
    context: Option<InvokeContext>,
) {
    let user = statsig_user(user.cloned());
    let metadata = usage_metadata(usage, context);

    tracing::debug!(method, "logging usage");

    statsig.log_event(&user, USAGE_EVENT, Some(method), metadata);
}

fn usage_metadata(usage: Option<HashMap<String, String>>, context: Option<InvokeContext>) -> HashMap<String, String> {
    let mut metadata = usage.unwrap_or_default();
    metadata.insert(SDK_TYPE_KEY.to_owned(), SDK_TYPE.to_owned());

    if let Some(context) = context {
        metadata.insert("latency_ms".to_owned(), context.elapsed_ms().to_string());
    }

    metadata
}
