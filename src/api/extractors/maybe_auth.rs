use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use std::sync::Arc;
use crate::domain::models::user::User;
use crate::state::AppState;

/// Like `AuthUser` but never rejects; anonymous callers get `None`.
/// Availability uses this to tag the caller's own reservations.
pub struct MaybeAuthUser(pub Option<User>);

impl FromRequestParts<Arc<AppState>> for MaybeAuthUser {
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let Some(user_id) = parts.headers.get("x-user-id").and_then(|v| v.to_str().ok()) else {
            return Ok(MaybeAuthUser(None));
        };

        match state.user_repo.find_by_id(user_id).await {
            Ok(user) => Ok(MaybeAuthUser(user)),
            Err(_) => Ok(MaybeAuthUser(None)),
        }
    }
}
