//! Password hashing and cookie-backed login sessions.

mod password;
mod session;

pub use password::{hash_password, verify_password};
pub use session::{
    clear_cookie, hash_token, new_token, read_cookie, session_cookie, SESSION_TOKEN_BYTES,
};
