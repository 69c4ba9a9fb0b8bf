//! Catalogue rules: record composition, title filtering and pagination.

use super::entities::{Movie, MovieCard, MovieDraft, MovieMetadata, MoviePage, StoredPoster};
use super::errors::DomainError;

/// Default number of movies per page.
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// Upper bound for a caller-supplied page size.
pub const MAX_PAGE_SIZE: usize = 50;

/// Highest star rating.
pub const MAX_RATING: u8 = 5;

/// Upstream marker for "no poster".
const NO_POSTER: &str = "N/A";

const UNTITLED: &str = "Untitled";

/// Folder uploaded posters live under.
pub const POSTER_FOLDER: &str = "asimovies";

/// Storage path for an uploaded poster: `asimovies/<unix_millis>_<file_name>`.
///
/// Only the last path component of `file_name` is kept, and characters outside
/// `[A-Za-z0-9._-]` become `_`.
pub fn poster_storage_path(file_name: &str, unix_millis: i64) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let mut clean: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if clean.trim_matches('.').is_empty() {
        clean = "poster".to_string();
    }
    format!("{}/{}_{}", POSTER_FOLDER, unix_millis, clean)
}

/// Normalize a search query: trim, lowercase, drop `.` and `-`.
pub fn sanitize_query(query: &str) -> String {
    query
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != '.' && *c != '-')
        .collect()
}

/// Keep movies whose lowercased title contains the sanitized query.
/// An empty sanitized query keeps everything.
pub fn filter_by_title(movies: Vec<Movie>, query: &str) -> Vec<Movie> {
    let needle = sanitize_query(query);
    if needle.is_empty() {
        return movies;
    }
    movies
        .into_iter()
        .filter(|m| m.title.to_lowercase().contains(&needle))
        .collect()
}

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_PAGE_SIZE)
}

/// Slice `cards` into one page starting at `offset`.
pub fn paginate(cards: Vec<MovieCard>, offset: usize, limit: usize) -> MoviePage {
    let limit = clamp_limit(limit);
    let total = cards.len();
    let items: Vec<MovieCard> = cards.into_iter().skip(offset).take(limit).collect();
    MoviePage {
        items,
        offset,
        limit,
        total,
        has_next: offset.saturating_add(limit) < total,
        has_previous: offset >= limit,
    }
}

/// Check the required fields of a movie form.
pub fn validate_draft(draft: &MovieDraft) -> Result<(), DomainError> {
    if draft.name.trim().is_empty() {
        return Err(DomainError::Validation(
            "Enter a name for the movie.".to_string(),
        ));
    }
    if draft.analysis.trim().is_empty() {
        return Err(DomainError::Validation(
            "Enter an analysis for the movie.".to_string(),
        ));
    }
    if draft.rating > MAX_RATING {
        return Err(DomainError::Validation(format!(
            "Rating must be between 0 and {}.",
            MAX_RATING
        )));
    }
    Ok(())
}

/// Build the record to save from the form and, when the lookup succeeded, its metadata.
///
/// `id` and `created_at` are supplied by the caller.
pub fn compose_movie(
    id: String,
    created_at: i64,
    draft: &MovieDraft,
    metadata: Option<MovieMetadata>,
) -> Movie {
    let Some(meta) = metadata else {
        return Movie {
            id,
            title: draft.name.clone(),
            analysis: draft.analysis.clone(),
            rating: draft.rating,
            photo_path: None,
            photo_url: None,
            omdb: None,
            created_at,
        };
    };

    let title = if meta.title.is_empty() {
        draft.name.clone()
    } else {
        meta.title.clone()
    };
    let analysis = if draft.analysis.is_empty() {
        meta.plot.clone()
    } else {
        draft.analysis.clone()
    };
    let photo_url = if draft.poster.is_none() && has_poster(&meta) {
        Some(meta.poster.clone())
    } else {
        None
    };

    Movie {
        id,
        title,
        analysis,
        rating: draft.rating,
        photo_path: None,
        photo_url,
        omdb: Some(meta),
        created_at,
    }
}

fn has_poster(meta: &MovieMetadata) -> bool {
    !meta.poster.is_empty() && meta.poster != NO_POSTER
}

/// Point the record at an uploaded poster. Overrides any upstream poster URL.
pub fn attach_upload(movie: &mut Movie, stored: StoredPoster) {
    movie.photo_path = Some(stored.path);
    movie.photo_url = Some(stored.url);
}

impl MovieCard {
    pub fn from_movie(movie: &Movie, default_poster: &str) -> Self {
        let title = if movie.title.is_empty() {
            UNTITLED.to_string()
        } else {
            movie.title.clone()
        };
        Self {
            id: movie.id.clone(),
            title,
            analysis: movie.analysis.clone(),
            rating: movie.rating,
            poster: movie
                .photo_url
                .clone()
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| default_poster.to_string()),
        }
    }
}
