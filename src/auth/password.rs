use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const ALGORITHM: &str = "sha256";
const ITERATIONS: u32 = 10_000;
const SALT_BYTES: usize = 16;

/// Hash a password with a fresh random salt.
///
/// The result has the form `sha256$<iterations>$<salt hex>$<digest hex>`.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut salt);
    encode(&salt, ITERATIONS, password)
}

/// Check a password against a stored hash. Malformed hashes never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(algorithm), Some(iterations), Some(salt), Some(_digest), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    if algorithm != ALGORITHM {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let Ok(salt) = hex::decode(salt) else {
        return false;
    };

    let candidate = encode(&salt, iterations, password);
    candidate.as_bytes().ct_eq(stored.as_bytes()).into()
}

fn encode(salt: &[u8], iterations: u32, password: &str) -> String {
    let mut digest = Sha256::new()
        .chain_update(salt)
        .chain_update(password.as_bytes())
        .finalize();
    for _ in 1..iterations {
        digest = Sha256::new()
            .chain_update(salt)
            .chain_update(digest)
            .finalize();
    }
    format!(
        "{}${}${}${}",
        ALGORITHM,
        iterations,
        hex::encode(salt),
        hex::encode(digest)
    )
}
