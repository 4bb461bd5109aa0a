use std::collections::HashMap;
use std::sync::OnceLock;

use azureai_inference::{
    ChatCompletionsClient, ChatCompletionsOptions, ChatRequestMessage, EmbeddingsClient, EmbeddingsOptions,
    ModelInfo, StatusCode, UpdateStream,
};
use secrecy::SecretString;
use statsig_client::{StatsigServer, StatsigUser};
use url::Url;

use crate::error::{Error, Result};
use crate::options::default_options;
use crate::telemetry::{log_invoke, log_usage};

/// Azure AI inference client that reports every call to Statsig
///
/// The chat and embeddings transports are created on first use and shared
/// by all later calls, including concurrent ones.
pub struct ModelClient {
    endpoint: Url,
    api_key: SecretString,
    defaults: Option<HashMap<String, String>>,
    statsig: StatsigServer,
    completions: OnceLock<ChatCompletionsClient>,
    embeddings: OnceLock<EmbeddingsClient>,
}

impl ModelClient {
    /// Create a client for an inference endpoint
    ///
    /// `defaults` maps option names to string values, as stored in a
    /// dynamic config; see [`default_options`] for the accepted keys.
    ///
    /// # Errors
    ///
    /// Returns an error if `endpoint` is not a valid URL
    pub fn new(
        statsig: StatsigServer,
        endpoint: &str,
        api_key: SecretString,
        defaults: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            api_key,
            defaults,
            statsig,
            completions: OnceLock::new(),
            embeddings: OnceLock::new(),
        })
    }

    /// Endpoint this client talks to
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Completion defaults this client was built with
    pub const fn defaults(&self) -> Option<&HashMap<String, String>> {
        self.defaults.as_ref()
    }

    // -- Chat --

    /// Complete a system prompt and a user message
    pub async fn complete_prompt(
        &self,
        system_message: &str,
        user_message: &str,
        user: Option<&StatsigUser>,
    ) -> Result<String> {
        let messages = vec![
            ChatRequestMessage::system(system_message),
            ChatRequestMessage::user(user_message),
        ];
        self.complete(messages, user).await
    }

    /// Complete a conversation and return the reply text
    ///
    /// Logs `invoke` before the call and `usage` with token counts after it.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the status is not 200 OK
    pub async fn complete(&self, messages: Vec<ChatRequestMessage>, user: Option<&StatsigUser>) -> Result<String> {
        let options = self.request_options(messages);

        let context = log_invoke(&self.statsig, user, "complete");
        let response = self.completions_client().complete(&options).await?;
        if response.status() != StatusCode::OK {
            return Err(Error::remote("complete the chat request", response.status()));
        }

        let value = response.into_value();
        log_usage(
            &self.statsig,
            user,
            "complete",
            Some(HashMap::from([
                ("model".to_owned(), value.model.clone()),
                ("completion_tokens".to_owned(), value.usage.completion_tokens.to_string()),
                ("prompt_tokens".to_owned(), value.usage.prompt_tokens.to_string()),
                ("total_tokens".to_owned(), value.usage.total_tokens.to_string()),
                ("created".to_owned(), format_created(value.created)),
            ])),
            Some(context),
        );

        Ok(value.content().to_owned())
    }

    /// Stream the completion of a system prompt and a user message
    pub async fn stream_complete_prompt(
        &self,
        system_message: &str,
        user_message: &str,
        user: Option<&StatsigUser>,
    ) -> Result<UpdateStream> {
        let messages = vec![
            ChatRequestMessage::system(system_message),
            ChatRequestMessage::user(user_message),
        ];
        self.stream_complete(messages, user).await
    }

    /// Stream the completion of a conversation
    ///
    /// Logs `invoke` before the call and `stream_begin` once the stream is
    /// open. Token usage at the end of the stream is not reported. Updates
    /// are fetched as the stream is polled; dropping it cancels the call.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot be opened or the status is not
    /// 200 OK
    pub async fn stream_complete(
        &self,
        messages: Vec<ChatRequestMessage>,
        user: Option<&StatsigUser>,
    ) -> Result<UpdateStream> {
        let options = self.request_options(messages);

        let context = log_invoke(&self.statsig, user, "stream");
        let response = self.completions_client().complete_streaming(&options).await?;
        if response.status() != StatusCode::OK {
            return Err(Error::remote("stream the chat request", response.status()));
        }

        log_usage(&self.statsig, user, "stream_begin", None, Some(context));

        Ok(response.into_updates())
    }

    // -- Model info --

    /// Fetch name, provider and type of the deployed model
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the status is not 200 OK
    pub async fn get_model_info(&self, user: Option<&StatsigUser>) -> Result<ModelInfo> {
        let context = log_invoke(&self.statsig, user, "getInfo");
        let response = self.completions_client().get_model_info().await?;
        if response.status() != StatusCode::OK {
            return Err(Error::remote("get the model info", response.status()));
        }

        let info = response.into_value();
        log_usage(
            &self.statsig,
            user,
            "get_model_info",
            Some(HashMap::from([
                ("model_name".to_owned(), info.model_name.clone()),
                ("model_provider_name".to_owned(), info.model_provider_name.clone()),
                ("model_type".to_owned(), info.model_type.to_string()),
            ])),
            Some(context),
        );

        Ok(info)
    }

    // -- Embeddings --

    /// Embed each input, returning one vector per input in input order
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the status is not 200 OK
    pub async fn get_embeddings<I, S>(&self, input: I, user: Option<&StatsigUser>) -> Result<Vec<Vec<f32>>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = EmbeddingsOptions::new(input);

        let context = log_invoke(&self.statsig, user, "getEmbeddings");
        let response = self.embeddings_client().embed(&options).await?;
        if response.status() != StatusCode::OK {
            return Err(Error::remote("embed the text", response.status()));
        }

        let mut value = response.into_value();
        log_usage(
            &self.statsig,
            user,
            "getEmbeddings",
            Some(HashMap::from([
                ("model".to_owned(), value.model.clone()),
                ("prompt_tokens".to_owned(), value.usage.prompt_tokens.to_string()),
                ("total_tokens".to_owned(), value.usage.total_tokens.to_string()),
                ("embedding_length".to_owned(), value.data.len().to_string()),
            ])),
            Some(context),
        );

        value.data.sort_by_key(|item| item.index);
        Ok(value.data.into_iter().map(|item| item.embedding).collect())
    }

    // -- Transports --

    fn request_options(&self, messages: Vec<ChatRequestMessage>) -> ChatCompletionsOptions {
        ChatCompletionsOptions {
            messages,
            ..default_options(self.defaults.as_ref())
        }
    }

    fn completions_client(&self) -> &ChatCompletionsClient {
        self.completions
            .get_or_init(|| ChatCompletionsClient::new(self.endpoint.clone(), self.api_key.clone()))
    }

    fn embeddings_client(&self) -> &EmbeddingsClient {
        self.embeddings
            .get_or_init(|| EmbeddingsClient::new(self.endpoint.clone(), self.api_key.clone()))
    }
}

impl std::fmt::Debug for ModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelClient")
            .field("endpoint", &self.endpoint)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Render a unix timestamp as RFC 3339, or as plain seconds if out of range
fn format_created(created: u64) -> String {
    i64::try_from(created)
        .ok()
        .and_then(|seconds| jiff::Timestamp::from_second(seconds).ok())
        .map_or_else(|| created.to_string(), |timestamp| timestamp.to_string())
}
