use serde::{Deserialize, Serialize};

// -- Chat completion request types --

/// Message in a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatRequestMessage {
    /// Instructions that steer the assistant
    System {
        /// Message text
        content: String,
    },
    /// Input from the end user
    User {
        /// Message text
        content: String,
    },
    /// Earlier reply from the assistant
    Assistant {
        /// Message text
        content: String,
    },
}

impl ChatRequestMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
        }
    }

    /// Text content of the message
    pub fn content(&self) -> &str {
        match self {
            Self::System { content } | Self::User { content } | Self::Assistant { content } => {
                content
            }
        }
    }
}

/// Options for a chat completions request
///
/// Unset sampling fields are omitted from the request body so the
/// deployment's own defaults apply
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatCompletionsOptions {
    /// Conversation messages
    pub messages: Vec<ChatRequestMessage>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Nucleus sampling factor
    #[serde(rename = "top_p", skip_serializing_if = "Option::is_none")]
    pub nucleus_sampling_factor: Option<f32>,
    /// Frequency penalty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    /// Presence penalty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    /// Seed for deterministic sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Stop sequences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    /// Model to route to on multi-model endpoints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

// -- Chat completion response types --

/// Chat completions response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletions {
    /// Unique response identifier
    pub id: String,
    /// Unix timestamp in seconds
    pub created: u64,
    /// Model that served the request
    pub model: String,
    /// Generated choices
    pub choices: Vec<ChatChoice>,
    /// Token usage statistics
    #[serde(default)]
    pub usage: CompletionsUsage,
}

impl ChatCompletions {
    /// Text of the first choice, empty when the model returned none
    pub fn content(&self) -> &str {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or_default()
    }
}

/// A single completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// Choice index
    pub index: u32,
    /// Generated message
    pub message: ChatResponseMessage,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message in a response choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessage {
    /// Role (always "assistant")
    pub role: String,
    /// Text content
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage for a chat completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CompletionsUsage {
    /// Tokens generated in the completion
    pub completion_tokens: u32,
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

// -- Streaming types --

/// Incremental update from a streaming chat completion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamingChatCompletionsUpdate {
    /// Response identifier shared by all updates of one stream
    pub id: String,
    /// Model that served the request
    pub model: String,
    /// Unix timestamp in seconds
    pub created: u64,
    /// Role, sent on the first update only
    pub role: Option<String>,
    /// New content since the previous update
    pub content_update: Option<String>,
    /// Why generation stopped, sent on the last update
    pub finish_reason: Option<String>,
    /// Token usage, when the service reports it
    pub usage: Option<CompletionsUsage>,
}

/// SSE chunk as sent on the wire
#[derive(Debug, Deserialize)]
pub(crate) struct StreamChunk {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
    #[serde(default)]
    pub usage: Option<CompletionsUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StreamChoice {
    #[serde(default)]
    pub delta: StreamDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StreamDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl From<StreamChunk> for StreamingChatCompletionsUpdate {
    fn from(chunk: StreamChunk) -> Self {
        let (role, content_update, finish_reason) = chunk
            .choices
            .into_iter()
            .next()
            .map(|choice| (choice.delta.role, choice.delta.content, choice.finish_reason))
            .unwrap_or_default();

        Self {
            id: chunk.id,
            model: chunk.model,
            created: chunk.created,
            role,
            content_update,
            finish_reason,
            usage: chunk.usage,
        }
    }
}

// -- Model info types --

/// Kind of model behind an endpoint
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ModelType {
    /// Text embeddings
    Embeddings,
    /// Image generation
    ImageGeneration,
    /// Text generation
    TextGeneration,
    /// Image embeddings
    ImageEmbeddings,
    /// Audio generation
    AudioGeneration,
    /// Chat completion
    ChatCompletion,
    /// Reported by the service but not known to this client
    #[serde(other)]
    Unknown,
}

/// Information about the deployed model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelInfo {
    /// Model name
    pub model_name: String,
    /// Model type
    pub model_type: ModelType,
    /// Provider that publishes the model
    pub model_provider_name: String,
}

// -- Embeddings types --

/// Options for an embeddings request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmbeddingsOptions {
    /// Texts to embed
    pub input: Vec<String>,
    /// Requested vector size, when the model supports truncation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,
    /// Model to route to on multi-model endpoints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl EmbeddingsOptions {
    /// Create options for the given inputs
    pub fn new<I, S>(input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: input.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Embeddings response
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsResult {
    /// Unique response identifier
    #[serde(default)]
    pub id: String,
    /// Model that served the request
    pub model: String,
    /// One item per input
    pub data: Vec<EmbeddingItem>,
    /// Token usage statistics
    #[serde(default)]
    pub usage: EmbeddingsUsage,
}

/// A single embedding vector
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingItem {
    /// Embedding vector
    pub embedding: Vec<f32>,
    /// Position of the matching input
    pub index: usize,
}

/// Token usage for an embeddings request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct EmbeddingsUsage {
    /// Tokens consumed by the input
    pub prompt_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}
