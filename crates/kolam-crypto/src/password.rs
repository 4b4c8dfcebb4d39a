use sha2::{Digest, Sha256};

/// One-way digest of a password: lowercase hex SHA-256 of its UTF-8 bytes.
///
/// Deterministic, so a login can look the row up by `(username, digest)`.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
