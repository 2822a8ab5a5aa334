use serde::Deserialize;

use super::{too_long, FormErrors, Validated, REQUIRED};
use crate::auth::verify_password;
use crate::entity::{User, USERNAME_MAX_LENGTH};
use crate::error::Result;
use crate::storage::SqliteStore;

pub const MIN_PASSWORD_LENGTH: usize = 8;

const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";
const INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
const PASSWORD_MISMATCH: &str = "The two password fields didn\u{2019}t match.";
const PASSWORD_NUMERIC: &str = "This password is entirely numeric.";

/// Submitted fields of the login page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Where to go after a successful login
    pub next: String,
}

impl LoginForm {
    /// Check the credentials, yielding the matching user
    pub fn authenticate(&self, store: &SqliteStore) -> Result<Validated<User>> {
        let mut errors = FormErrors::new();
        let username = self.username.trim();

        if username.is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        if !errors.is_empty() {
            return Ok(Validated::Invalid(errors));
        }

        match store.find_credentials(username)? {
            Some((user, hash)) if verify_password(&self.password, &hash) => Ok(Validated::Valid(user)),
            _ => {
                tracing::warn!(username, "failed login attempt");
                errors.add_non_field(INVALID_LOGIN);
                Ok(Validated::Invalid(errors))
            }
        }
    }
}

/// Submitted fields of the signup page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

/// A username and password that passed signup validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self, store: &SqliteStore) -> Result<Validated<NewAccount>> {
        let mut errors = FormErrors::new();
        let username = self.username.trim();

        let username_len = username.chars().count();
        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else if username_len > USERNAME_MAX_LENGTH {
            errors.add("username", too_long(USERNAME_MAX_LENGTH, username_len));
        } else if !is_valid_username(username) {
            errors.add("username", INVALID_USERNAME);
        } else if store.username_exists(username)? {
            errors.add("username", USERNAME_TAKEN);
        }

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if self.password1 != self.password2 {
            errors.add("password2", PASSWORD_MISMATCH);
        } else {
            for message in password_problems(&self.password2) {
                errors.add("password2", message);
            }
        }

        Ok(errors.into_validated(NewAccount {
            username: username.to_string(),
            password: self.password1.clone(),
        }))
    }
}

/// Letters, digits and `@ . + - _`
fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

fn password_problems(password: &str) -> Vec<String> {
    let mut problems = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(format!(
            "This password is too short. It must contain at least {} characters.",
            MIN_PASSWORD_LENGTH
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        problems.push(PASSWORD_NUMERIC.to_string());
    }
    problems
}
