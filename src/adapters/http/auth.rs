//! Guard extractor for routes that need a signed-in, verified user.
//!
//! The caller identifies itself with the `x-user-id` header (the uid returned at sign-in).

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::error::ApiError;
use super::state::AppState;
use crate::domain::Identity;

pub const USER_ID_HEADER: &str = "x-user-id";

/// A verified identity. Rejects with 401 and the path to resume at.
pub struct AuthenticatedUser(pub Identity);

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let uid = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim);
        let return_url = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        let identity = state.accounts.authorize(uid, return_url).await?;
        Ok(AuthenticatedUser(identity))
    }
}
