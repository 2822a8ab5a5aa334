//! Request extractors resolving the logged-in user from the session cookie.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;

use super::{AppState, WebError};
use crate::auth::{hash_token, read_cookie};
use crate::entity::User;

/// The logged-in user, if any. Never rejects a request for being anonymous.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = read_cookie(&parts.headers, &state.sessions.cookie_name) else {
            return Ok(CurrentUser(None));
        };

        let store = state.store.lock().await;
        let user = store.session_user(&hash_token(&token), Utc::now())?;
        Ok(CurrentUser(user))
    }
}

/// The logged-in user. Anonymous requests are redirected to the login page
/// with the requested path in `next`.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        match user {
            Some(user) => Ok(RequireUser(user)),
            None => {
                let next = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| parts.uri.path().to_string());
                tracing::debug!(next = %next, "anonymous request to protected page");
                Err(WebError::Unauthenticated { next })
            }
        }
    }
}
