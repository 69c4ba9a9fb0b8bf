//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod account;
pub mod catalog;
pub mod entities;
pub mod errors;

pub use account::{AccessDecision, IdentityError};
pub use entities::{
    Identity, Movie, MovieCard, MovieDraft, MovieMetadata, MoviePage, PosterUpload, StoredPoster,
    User, UserRole,
};
pub use errors::DomainError;
