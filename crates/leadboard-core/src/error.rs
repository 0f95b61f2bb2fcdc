use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadboardError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Update rejected: {message}")]
    Conflict { message: String },

    #[error("Session expired, sign in again")]
    AuthExpired,
}

impl LeadboardError {
    /// Message suitable for a user-facing banner.
    pub fn banner_message(&self) -> String {
        match self {
            Self::Conflict { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Errors that invalidate the whole session rather than a single request.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }
}
