use litellm_client::ClientError;
use litellm_core::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("unknown data source type: {0}")]
    UnknownDataSource(String),

    #[error("{0} cannot be updated in place; it must be replaced")]
    UpdateNotSupported(String),

    #[error("invalid import id '{id}': {message}")]
    InvalidImportId { id: String, message: String },

    #[error("resource has no id")]
    MissingId,
}

impl ProviderError {
    /// Short, user-facing summary used as the diagnostic title.
    pub fn summary(&self) -> &'static str {
        match self {
            ProviderError::Client(ClientError::Configuration(_)) => {
                "Invalid provider configuration"
            }
            ProviderError::Client(ClientError::Validation(_)) | ProviderError::Validation(_) => {
                "Invalid attribute value"
            }
            ProviderError::Client(ClientError::Transport(_)) => "Transport error",
            ProviderError::Client(ClientError::AuthEndpoint { .. })
            | ProviderError::Client(ClientError::MissingTokenAttribute { .. }) => {
                "Failed to obtain JWT token"
            }
            ProviderError::Client(ClientError::RequestConstruction(_)) => "Failed to build request",
            ProviderError::Client(ClientError::ApiRequest { .. }) => "LiteLLM API request failed",
            ProviderError::Client(ClientError::Decode(_)) => "Failed to decode LiteLLM response",
            ProviderError::UnknownResourceType(_) | ProviderError::UnknownDataSource(_) => {
                "Unsupported type"
            }
            ProviderError::UpdateNotSupported(_) => "Update not supported",
            ProviderError::InvalidImportId { .. } => "Invalid import id",
            ProviderError::MissingId => "Missing resource id",
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
