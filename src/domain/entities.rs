//! Domain entities. Pure data structures for the catalogue.
//!
//! No HTTP/SQL types here; adapters map into these.

use serde::{Deserialize, Serialize};

/// Trimmed movie metadata as returned by the relay endpoint.
///
/// Values are passed through from the metadata source unchanged: `rating` is the
/// source's textual rating and `poster` may be the literal `"N/A"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieMetadata {
    pub title: String,
    pub rating: String,
    pub plot: String,
    pub poster: String,
}

/// A stored movie record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    /// User review, or the upstream plot when the user left it empty.
    pub analysis: String,
    /// Star rating given by the user, 0..=5.
    pub rating: u8,
    /// Storage path of an uploaded poster.
    pub photo_path: Option<String>,
    /// Public poster URL (uploaded file or upstream poster).
    pub photo_url: Option<String>,
    /// Raw upstream fields, kept for later use.
    pub omdb: Option<MovieMetadata>,
    pub created_at: i64,
}

/// Poster file attached to a new movie.
#[derive(Debug, Clone)]
pub struct PosterUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Where a poster landed after upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPoster {
    pub path: String,
    pub url: String,
}

/// Movie form input, before lookup and upload.
#[derive(Debug, Clone, Default)]
pub struct MovieDraft {
    pub name: String,
    pub rating: u8,
    pub analysis: String,
    pub poster: Option<PosterUpload>,
}

/// Display view of a movie with fallbacks applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieCard {
    pub id: String,
    pub title: String,
    pub analysis: String,
    pub rating: u8,
    pub poster: String,
}

/// One page of the (optionally filtered) movie list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub items: Vec<MovieCard>,
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    /// Unknown tags fall back to `User`.
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

/// User profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// What the identity provider knows about a signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub email_verified: bool,
}
