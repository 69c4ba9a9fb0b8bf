//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

use super::account::IdentityError;

#[derive(Error, Debug)]
pub enum DomainError {
    /// A required request parameter was absent or empty.
    #[error("Parameter \"{0}\" is required.")]
    MissingParameter(&'static str),

    #[error("{0}")]
    NotFound(String),

    /// The metadata source failed (transport, status or body).
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Identity(IdentityError),

    /// Caller has no verified identity. `return_url` is where to resume after login.
    #[error("Authentication required")]
    Unauthorized { return_url: String },

    #[error("Repository error: {0}")]
    Repo(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<IdentityError> for DomainError {
    fn from(e: IdentityError) -> Self {
        DomainError::Identity(e)
    }
}
