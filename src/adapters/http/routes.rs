//! Route handlers. Thin: decode the request, call a use case, encode the result.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::debug;

use super::auth::AuthenticatedUser;
use super::error::ApiError;
use super::extract::{ApiJson, ApiQuery};
use super::state::AppState;
use crate::domain::{DomainError, Movie, MovieDraft, MovieMetadata, MoviePage, PosterUpload, User};
use crate::usecases::Registration;

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct OmdbQuery {
    title: Option<String>,
}

/// `GET /api/omdb?title=<string>`: the relay endpoint.
pub async fn omdb_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<OmdbQuery>,
) -> ApiResult<Json<MovieMetadata>> {
    let metadata = state.lookup.lookup(query.title.as_deref()).await?;
    Ok(Json(metadata))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    q: String,
    #[serde(default)]
    offset: usize,
    limit: Option<usize>,
}

pub async fn list_movies(
    _user: AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<MoviePage>> {
    let page = state
        .catalog
        .list_movies(&query.q, query.offset, query.limit)
        .await?;
    Ok(Json(page))
}

/// `POST /api/movies`: multipart fields `name`, `rating`, `analysis`, optional file `poster`.
pub async fn create_movie(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<Movie>)> {
    let draft = read_movie_form(multipart?).await?;
    debug!(uid = %identity.uid, name = %draft.name, "adding movie");
    let movie = state.catalog.add_movie(draft).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

fn malformed(e: impl std::fmt::Display) -> DomainError {
    DomainError::Validation(format!("Malformed form data: {}", e))
}

async fn read_movie_form(mut multipart: Multipart) -> Result<MovieDraft, DomainError> {
    let mut draft = MovieDraft::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => draft.name = field.text().await.map_err(malformed)?,
            "analysis" => draft.analysis = field.text().await.map_err(malformed)?,
            "rating" => {
                let raw = field.text().await.map_err(malformed)?;
                let raw = raw.trim();
                draft.rating = if raw.is_empty() {
                    0
                } else {
                    raw.parse().map_err(|_| {
                        DomainError::Validation(format!("Invalid rating: {}", raw))
                    })?
                };
            }
            "poster" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(malformed)?;
                // An empty file input still sends the part; skip it.
                if !bytes.is_empty() {
                    draft.poster = Some(PosterUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            other => debug!(field = other, "ignoring unknown form field"),
        }
    }

    Ok(draft)
}

pub async fn get_movie(
    _user: AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Movie>> {
    Ok(Json(state.catalog.get_movie(&id).await?))
}

pub async fn delete_movie(
    _user: AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.catalog.delete_movie(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    confirm_password: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state
        .accounts
        .register(Registration {
            name: req.name,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    #[serde(default)]
    token: String,
}

/// `POST /api/users/verify` with the token from the verification e-mail.
pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<VerifyEmailRequest>,
) -> ApiResult<StatusCode> {
    state.accounts.verify_email(&req.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.accounts.login(&req.email, &req.password).await?))
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    #[serde(default)]
    email: String,
}

/// Always 202, whether or not the address belongs to an account.
pub async fn password_reset(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PasswordResetRequest>,
) -> ApiResult<StatusCode> {
    state.accounts.request_password_reset(&req.email).await;
    Ok(StatusCode::ACCEPTED)
}

pub async fn me(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.accounts.profile(&identity.uid).await?))
}
