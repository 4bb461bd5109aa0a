use std::collections::HashMap;
use std::str::FromStr;

use azureai_inference::ChatCompletionsOptions;

/// Build request options from string-valued completion defaults
///
/// Recognized keys are `temperature`, `max_tokens`, `top_p`,
/// `frequency_penalty`, `presence_penalty` and `seed`. A value that does not
/// parse, a non-positive `max_tokens`, or an unknown key leaves the option
/// unset. `stop` is accepted but not applied.
pub fn default_options(defaults: Option<&HashMap<String, String>>) -> ChatCompletionsOptions {
    let mut options = ChatCompletionsOptions::default();
    let Some(defaults) = defaults else {
        return options;
    };

    for (key, value) in defaults {
        let applied = match key.as_str() {
            "temperature" => parse(value).map(|v| options.temperature = Some(v)),
            "max_tokens" => parse::<i32>(value)
                .and_then(|v| u32::try_from(v).ok())
                .filter(|v| *v > 0)
                .map(|v| options.max_tokens = Some(v)),
            "top_p" => parse(value).map(|v| options.nucleus_sampling_factor = Some(v)),
            "frequency_penalty" => parse(value).map(|v| options.frequency_penalty = Some(v)),
            "presence_penalty" => parse(value).map(|v| options.presence_penalty = Some(v)),
            "seed" => parse::<i32>(value).map(|v| options.seed = Some(i64::from(v))),
            // `stop` is recognized but stop sequences are not applied
            _ => None,
        };

        if applied.is_none() {
            tracing::debug!(key = %key, value = %value, "ignoring completion default");
        }
    }

    options
}

fn parse<T: FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}
