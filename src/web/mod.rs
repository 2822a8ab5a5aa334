//! HTTP front end: routes, shared state and the server loop.

pub mod error;
mod extract;
mod notes;
pub mod pages;
mod users;

use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::sync::Mutex;
use tower::ServiceBuilder;

pub use error::WebError;
pub use extract::{CurrentUser, RequireUser};

use crate::config::Config;
use crate::error::Result;
use crate::storage::SqliteStore;

/// URL paths of every page
pub mod paths {
    pub const HOME: &str = "/";
    pub const LIST: &str = "/notes/";
    pub const ADD: &str = "/notes/add";
    pub const SUCCESS: &str = "/notes/success";
    pub const LOGIN: &str = "/users/login";
    pub const LOGOUT: &str = "/users/logout";
    pub const SIGNUP: &str = "/users/signup";

    pub fn detail(slug: &str) -> String {
        format!("/notes/{}/", slug)
    }

    pub fn edit(slug: &str) -> String {
        format!("/notes/{}/edit", slug)
    }

    pub fn delete(slug: &str) -> String {
        format!("/notes/{}/delete", slug)
    }
}

/// Session cookie settings shared by every handler
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub ttl: chrono::Duration,
}

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The note store (wrapped in Mutex since a SQLite connection is not Sync).
    pub store: Arc<Mutex<SqliteStore>>,
    pub sessions: Arc<SessionSettings>,
}

impl AppState {
    pub fn new(store: SqliteStore, config: &Config) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            sessions: Arc::new(SessionSettings {
                cookie_name: config.session_cookie.clone(),
                ttl: chrono::Duration::days(config.session_ttl_days),
            }),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(paths::HOME, get(notes::home))
        .route(paths::LIST, get(notes::list))
        .route(paths::ADD, get(notes::add_form).post(notes::add))
        .route(paths::SUCCESS, get(notes::success))
        .route("/notes/{slug}/", get(notes::detail))
        .route("/notes/{slug}/edit", get(notes::edit_form).post(notes::edit))
        .route(
            "/notes/{slug}/delete",
            get(notes::delete_confirm)
                .post(notes::delete)
                .delete(notes::delete),
        )
        .route(paths::LOGIN, get(users::login_form).post(users::login))
        .route(paths::LOGOUT, get(users::logout).post(users::logout))
        .route(paths::SIGNUP, get(users::signup_form).post(users::signup))
        .fallback(|| async { WebError::NotFound })
        .layer(ServiceBuilder::new().layer(middleware::from_fn(log_request)))
        .with_state(state)
}

/// Open the store and serve HTTP until Ctrl-C
pub async fn serve(config: Config) -> Result<()> {
    let addr = config.listen_addr()?;
    let store = SqliteStore::open(&config.database)?;
    let app = router(AppState::new(store, &config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, database = %config.database.display(), "notebox listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown requested");
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

/// `302 Found` redirect. Bytes outside visible ASCII are percent-encoded.
pub fn found(location: &str) -> Response {
    let location = percent_encode(location, |byte| byte.is_ascii_graphic());
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}

/// Login page URL that returns to `next` afterwards
pub fn login_url(next: &str) -> String {
    format!("{}?next={}", paths::LOGIN, encode_query_value(next))
}

/// Percent-encode a query value, leaving unreserved characters and `/` as-is
fn encode_query_value(value: &str) -> String {
    percent_encode(value, |byte| {
        byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~' | b'/')
    })
}

fn percent_encode(value: &str, keep: impl Fn(u8) -> bool) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if keep(byte) {
            out.push(byte as char);
        } else {
            let _ = write!(out, "%{:02X}", byte);
        }
    }
    out
}

/// Post-login destination: `next` if it is a local path, otherwise home
pub fn safe_next(next: &str) -> &str {
    let local = next.starts_with('/') && !next.starts_with("//") && !next.contains('\\');
    if local {
        next
    } else {
        paths::HOME
    }
}
