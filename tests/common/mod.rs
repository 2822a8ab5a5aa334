//! Shared fixtures for driving the router in-process.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use url::form_urlencoded;

use notebox::auth::{hash_password, hash_token, new_token};
use notebox::entity::{Note, NoteDraft, User};
use notebox::{router, AppState, Config, SqliteStore};

pub const PASSWORD: &str = "correct-horse-battery";

/// A router over a private in-memory database
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    cookie_name: String,
}

impl TestApp {
    pub fn new() -> Self {
        let config = Config::default();
        let store = SqliteStore::open_in_memory().unwrap();
        let state = AppState::new(store, &config);
        Self {
            app: router(state.clone()),
            state,
            cookie_name: config.session_cookie,
        }
    }

    pub async fn create_user(&self, username: &str) -> User {
        let store = self.state.store.lock().await;
        store.create_user(username, &hash_password(PASSWORD)).unwrap()
    }

    pub async fn create_note(&self, author: &User, title: &str, text: &str, slug: &str) -> Note {
        let store = self.state.store.lock().await;
        store
            .create_note(author.id, &NoteDraft::new(title, text, slug))
            .unwrap()
    }

    pub async fn get_note(&self, id: i64) -> Option<Note> {
        let store = self.state.store.lock().await;
        store.get_note(id).unwrap()
    }

    pub async fn note_count(&self) -> usize {
        let store = self.state.store.lock().await;
        store.count_notes().unwrap()
    }

    pub async fn note_count_for(&self, author: &User) -> usize {
        let store = self.state.store.lock().await;
        store.count_notes_for_author(author.id).unwrap()
    }

    pub async fn notes_of(&self, author: &User) -> Vec<Note> {
        let store = self.state.store.lock().await;
        store.list_notes_for_author(author.id).unwrap()
    }

    pub async fn latest_note(&self) -> Note {
        let store = self.state.store.lock().await;
        let mut notes: Vec<Note> = store
            .list_users()
            .unwrap()
            .iter()
            .flat_map(|user| store.list_notes_for_author(user.id).unwrap())
            .collect();
        notes.sort_by_key(|note| note.id);
        notes.pop().expect("no notes")
    }

    pub async fn delete_all_notes(&self) {
        let store = self.state.store.lock().await;
        for user in store.list_users().unwrap() {
            for note in store.list_notes_for_author(user.id).unwrap() {
                store.delete_note(note.id, user.id).unwrap();
            }
        }
    }

    /// A client with no session
    pub fn anonymous(&self) -> Client {
        Client {
            app: self.app.clone(),
            cookie: None,
        }
    }

    /// A client already logged in as `user`, without going through the login form
    pub async fn client_for(&self, user: &User) -> Client {
        let token = new_token();
        {
            let store = self.state.store.lock().await;
            store
                .insert_session(&hash_token(&token), user.id, Utc::now() + Duration::days(1))
                .unwrap();
        }
        Client {
            app: self.app.clone(),
            cookie: Some(format!("{}={}", self.cookie_name, token)),
        }
    }
}

pub struct Client {
    app: Router,
    cookie: Option<String>,
}

impl Client {
    pub fn with_cookie(app: &TestApp, cookie: &str) -> Self {
        Client {
            app: app.app.clone(),
            cookie: Some(cookie.to_string()),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    pub async fn post(&self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        self.send(Method::POST, uri, Some(encode_form(form))).await
    }

    async fn send(&self, method: Method, uri: &str, form: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let request = match form {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn assert_redirects(&self, to: &str) {
        assert_eq!(self.status, StatusCode::FOUND, "body: {}", self.body);
        assert_eq!(self.location(), Some(to));
    }
}

/// Encode pairs as an `application/x-www-form-urlencoded` body
pub fn encode_form(pairs: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
