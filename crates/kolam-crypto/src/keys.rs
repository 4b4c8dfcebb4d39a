use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

/// Generate a random 256-bit secret for signing session tokens, base64-encoded.
pub fn generate_session_secret() -> String {
    let key: [u8; 32] = rand::random();
    BASE64.encode(key)
}
