use litellm_core::ValidationError;
use thiserror::Error;

/// Errors raised while configuring the client or talking to the proxy.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("token endpoint returned status {status}")]
    AuthEndpoint { status: u16 },

    #[error("token attribute '{attribute}' not found in token endpoint response")]
    MissingTokenAttribute { attribute: String },

    #[error("failed to build request: {0}")]
    RequestConstruction(String),

    #[error("{operation} failed with status {status}: {message}")]
    ApiRequest {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Status code carried by the error, if it came from an HTTP response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::AuthEndpoint { status } | ClientError::ApiRequest { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
