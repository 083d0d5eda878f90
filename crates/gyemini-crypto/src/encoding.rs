use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::{CryptoError, Result};

/// Base64 of the UTF-8 bytes of `text`.
pub fn base64_encode(text: &str) -> String {
    BASE64.encode(text.as_bytes())
}

pub fn base64_decode(encoded: &str) -> Result<String> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|_| CryptoError::InvalidBase64)?;
    String::from_utf8(bytes).map_err(|_| CryptoError::InvalidUtf8)
}
