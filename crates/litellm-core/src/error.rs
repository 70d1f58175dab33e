use thiserror::Error;

/// Rejected configuration values, raised before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is not a valid role")]
    InvalidRole(String),

    #[error("only roles `admin` and `user` are authorized in a team membership, got `{0}`")]
    InvalidTeamRole(String),

    #[error("missing required attribute: {0}")]
    MissingAttribute(String),

    #[error("attribute {attribute} expects a value of type {expected}")]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
    },

    #[error("unsupported attribute: {0}")]
    UnknownAttribute(String),

    #[error("invalid value for {attribute}: {message}")]
    InvalidValue { attribute: String, message: String },
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
