use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use chrono::Utc;
use serde::Deserialize;

use super::{found, pages, paths, safe_next, AppState, CurrentUser, WebError};
use crate::auth::{clear_cookie, hash_password, hash_token, new_token, read_cookie, session_cookie};
use crate::error::NoteboxError;
use crate::forms::{FormErrors, LoginForm, SignupForm, Validated, USERNAME_TAKEN};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextParam {
    next: String,
}

pub async fn login_form(CurrentUser(user): CurrentUser, Query(params): Query<NextParam>) -> Html<String> {
    let form = LoginForm {
        next: params.next,
        ..LoginForm::default()
    };
    Html(pages::login(user.as_ref(), &form, &FormErrors::new()))
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Response, WebError> {
    let token = new_token();
    let now = Utc::now();

    {
        let store = state.store.lock().await;
        let user = match form.authenticate(&store)? {
            Validated::Valid(user) => user,
            Validated::Invalid(errors) => {
                return Ok(Html(pages::login(None, &form, &errors)).into_response());
            }
        };

        let purged = store.purge_expired_sessions(now)?;
        if purged > 0 {
            tracing::debug!(purged, "expired sessions removed");
        }
        store.insert_session(&hash_token(&token), user.id, now + state.sessions.ttl)?;
        tracing::info!(user = %user.username, "user logged in");
    }

    let mut response = found(safe_next(&form.next));
    let cookie = session_cookie(
        &state.sessions.cookie_name,
        &token,
        state.sessions.ttl.num_seconds(),
    );
    set_cookie(&mut response, &cookie)?;
    Ok(response)
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, WebError> {
    if let Some(token) = read_cookie(&headers, &state.sessions.cookie_name) {
        let store = state.store.lock().await;
        store.delete_session(&hash_token(&token))?;
        tracing::info!("user logged out");
    }

    let mut response = Html(pages::logged_out()).into_response();
    set_cookie(&mut response, &clear_cookie(&state.sessions.cookie_name))?;
    Ok(response)
}

pub async fn signup_form(CurrentUser(user): CurrentUser) -> Html<String> {
    Html(pages::signup(
        user.as_ref(),
        &SignupForm::default(),
        &FormErrors::new(),
    ))
}

pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Result<Response, WebError> {
    let store = state.store.lock().await;

    let account = match form.validate(&store)? {
        Validated::Valid(account) => account,
        Validated::Invalid(errors) => {
            return Ok(Html(pages::signup(None, &form, &errors)).into_response());
        }
    };

    match store.create_user(&account.username, &hash_password(&account.password)) {
        Ok(user) => {
            tracing::info!(user = %user.username, "user signed up");
            Ok(found(paths::LOGIN))
        }
        Err(NoteboxError::UsernameTaken(_)) => {
            let mut errors = FormErrors::new();
            errors.add("username", USERNAME_TAKEN);
            Ok(Html(pages::signup(None, &form, &errors)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

fn set_cookie(response: &mut Response, cookie: &str) -> Result<(), WebError> {
    let value = cookie
        .parse()
        .map_err(|_| WebError::Internal(format!("invalid cookie header: {}", cookie)))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(())
}
