/// Errors returned by the Statsig client
#[derive(Debug, thiserror::Error)]
pub enum StatsigError {
    /// HTTP transport or connection error
    #[error("statsig request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Statsig returned a non-success status
    #[error("statsig API error ({status}): {message}")]
    Api {
        /// HTTP status from Statsig
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// Key is not a server secret key
    #[error("invalid server key: server keys start with `secret-`")]
    InvalidSdkKey,

    /// Options could not be applied
    #[error("invalid options: {0}")]
    Options(String),
}
