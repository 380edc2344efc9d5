use thiserror::Error;

/// Errors raised while loading or calling a chat model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceClientError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("Request Error: {0}")]
    Request(String),
    /// The provider answered with an error status or an error envelope.
    #[error("API Error: {0}")]
    Api(String),
    /// A request or response body could not be (de)serialized.
    #[error("Serialization Error: {0}")]
    Serialization(String),
    /// The client or model identifier is misconfigured.
    #[error("Config Error: {0}")]
    Config(String),
    /// The provider does not support the requested feature.
    #[error("Unsupported: {0}")]
    Unsupported(String),
    /// The model answered, but not with content matching the requested schema.
    #[error("Structured output error: {0}")]
    StructuredOutput(String),
}

impl From<reqwest::Error> for InferenceClientError {
    fn from(err: reqwest::Error) -> Self {
        InferenceClientError::Request(err.to_string())
    }
}

impl From<serde_json::Error> for InferenceClientError {
    fn from(err: serde_json::Error) -> Self {
        InferenceClientError::Serialization(err.to_string())
    }
}
