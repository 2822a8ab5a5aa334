use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Length of a raw session token before hex encoding
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Generate a new random session token (hex encoded)
pub fn new_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash of a session token, as stored server-side
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// `Set-Cookie` value that installs a session
pub fn session_cookie(name: &str, token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        name, token, max_age_secs
    )
}

/// `Set-Cookie` value that removes a session cookie
pub fn clear_cookie(name: &str) -> String {
    format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", name)
}

/// Find a cookie value in the request's `Cookie` headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_new_token_is_hex() {
        let token = new_token();
        assert_eq!(token.len(), SESSION_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, new_token());
    }

    #[test]
    fn test_hash_token_is_stable() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
        assert_eq!(hash_token("abc").len(), 64);
    }

    #[test]
    fn test_read_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; sid=abc123"));
        headers.append(COOKIE, HeaderValue::from_static("other=1"));

        assert_eq!(read_cookie(&headers, "sid"), Some("abc123".to_string()));
        assert_eq!(read_cookie(&headers, "other"), Some("1".to_string()));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_empty_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("sid="));
        assert_eq!(read_cookie(&headers, "sid"), None);
    }

    #[test]
    fn test_cookie_strings() {
        assert_eq!(
            session_cookie("sid", "tok", 60),
            "sid=tok; Path=/; Max-Age=60; HttpOnly; SameSite=Lax"
        );
        assert!(clear_cookie("sid").starts_with("sid=; Path=/; Max-Age=0"));
    }
}
