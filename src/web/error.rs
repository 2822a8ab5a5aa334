//! Errors raised by request handlers and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use super::{found, login_url, pages};
use crate::error::NoteboxError;

/// Failures a handler can end with.
///
/// A note owned by someone else is reported as `NotFound`, never as a
/// permission error, so that its existence does not leak.
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Not found")]
    NotFound,

    #[error("Login required to access {next}")]
    Unauthenticated { next: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<NoteboxError> for WebError {
    fn from(err: NoteboxError) -> Self {
        match err {
            NoteboxError::NoteNotFound(_) => WebError::NotFound,
            other => WebError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound => (StatusCode::NOT_FOUND, Html(pages::not_found())).into_response(),
            WebError::Unauthenticated { next } => found(&login_url(&next)),
            WebError::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(pages::server_error())).into_response()
            }
        }
    }
}
