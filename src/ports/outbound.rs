//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, Identity, IdentityError, Movie, MovieMetadata, User};

/// External movie metadata source (OMDb).
#[async_trait::async_trait]
pub trait MetadataPort: Send + Sync {
    /// Look up a movie by exact title. Exactly one outbound request per call.
    ///
    /// Returns `NotFound` with the source's message when it has no match, and
    /// `Upstream` for transport, status or decoding failures.
    async fn lookup_title(&self, title: &str) -> Result<MovieMetadata, DomainError>;
}

/// Movie document store.
#[async_trait::async_trait]
pub trait MovieRepoPort: Send + Sync {
    async fn add_movie(&self, movie: &Movie) -> Result<(), DomainError>;

    /// All movies, newest first.
    async fn list_movies(&self) -> Result<Vec<Movie>, DomainError>;

    async fn get_movie(&self, id: &str) -> Result<Option<Movie>, DomainError>;

    /// Returns false when no movie had that id.
    async fn delete_movie(&self, id: &str) -> Result<bool, DomainError>;
}

/// User profile store, keyed by identity uid.
#[async_trait::async_trait]
pub trait UserRepoPort: Send + Sync {
    /// Insert or replace the profile.
    async fn save_user(&self, user: &User) -> Result<(), DomainError>;

    async fn get_user(&self, id: &str) -> Result<Option<User>, DomainError>;
}

/// Identity provider: credentials and e-mail verification state.
#[async_trait::async_trait]
pub trait IdentityPort: Send + Sync {
    /// Create an account. New accounts start unverified, and a verification token is
    /// queued for delivery to the address.
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, DomainError>;

    /// Check credentials. Does not look at verification state.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    async fn get_identity(&self, uid: &str) -> Result<Option<Identity>, DomainError>;

    /// Mark the account holding this verification token as verified and consume the token.
    /// Returns `None` for unknown or already used tokens.
    async fn confirm_email(&self, token: &str) -> Result<Option<Identity>, DomainError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), DomainError>;
}

/// Poster file storage.
#[async_trait::async_trait]
pub trait PosterStorePort: Send + Sync {
    /// Store `bytes` under the relative `path` and return its public URL.
    async fn upload(&self, path: &str, bytes: &[u8]) -> Result<String, DomainError>;

    async fn remove(&self, path: &str) -> Result<(), DomainError>;
}
