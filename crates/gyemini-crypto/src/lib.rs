/// Gyemini text crypto
///
/// Backs the encryption calculator: reversible encodings (Base64),
/// one-way digests (MD5, SHA-256) and password-based AES-256-GCM.
/// Everything operates on UTF-8 text in and text out.

pub mod digest;
pub mod encoding;
pub mod encrypt;
pub mod keys;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("input text is empty")]
    EmptyInput,

    #[error("secret key must be at least {min} characters")]
    WeakKey { min: usize },

    #[error("not a valid Base64 string")]
    InvalidBase64,

    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,

    #[error("{0} is one-way and cannot be decrypted")]
    NotReversible(&'static str),

    #[error("encryption failed")]
    EncryptFailed,

    #[error("decryption failed (wrong key or corrupted data)")]
    DecryptFailed,
}

pub type Result<T> = std::result::Result<T, CryptoError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Base64,
    Aes,
    Md5,
    Sha256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[default]
    Encrypt,
    Decrypt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformed {
    pub algorithm: Algorithm,
    pub operation: Operation,
    pub output: String,
    pub input_length: usize,
    pub output_length: usize,
}

/// Run one calculator operation. `secret` is only consulted for AES.
pub fn transform(
    algorithm: Algorithm,
    operation: Operation,
    input: &str,
    secret: Option<&str>,
) -> Result<Transformed> {
    if input.trim().is_empty() {
        return Err(CryptoError::EmptyInput);
    }

    let output = match (algorithm, operation) {
        (Algorithm::Base64, Operation::Encrypt) => encoding::base64_encode(input),
        (Algorithm::Base64, Operation::Decrypt) => encoding::base64_decode(input)?,
        (Algorithm::Md5, Operation::Encrypt) => digest::md5_hex(input),
        (Algorithm::Sha256, Operation::Encrypt) => digest::sha256_hex(input),
        (Algorithm::Md5, Operation::Decrypt) => return Err(CryptoError::NotReversible("MD5")),
        (Algorithm::Sha256, Operation::Decrypt) => {
            return Err(CryptoError::NotReversible("SHA-256"));
        }
        (Algorithm::Aes, Operation::Encrypt) => encrypt::encrypt_text(input, secret.unwrap_or(""))?,
        (Algorithm::Aes, Operation::Decrypt) => encrypt::decrypt_text(input, secret.unwrap_or(""))?,
    };

    Ok(Transformed {
        algorithm,
        operation,
        input_length: input.chars().count(),
        output_length: output.chars().count(),
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_and_reports_lengths() {
        let t = transform(Algorithm::Base64, Operation::Encrypt, "안녕", None).unwrap();
        assert_eq!(t.output, "7JWI64WV");
        assert_eq!(t.input_length, 2);
        assert_eq!(t.output_length, 8);
    }

    #[test]
    fn hashes_cannot_be_reversed() {
        assert_eq!(
            transform(Algorithm::Md5, Operation::Decrypt, "abc", None),
            Err(CryptoError::NotReversible("MD5"))
        );
    }

    #[test]
    fn blank_input_rejected() {
        assert_eq!(
            transform(Algorithm::Sha256, Operation::Encrypt, "   ", None),
            Err(CryptoError::EmptyInput)
        );
    }

    #[test]
    fn aes_requires_secret() {
        assert_eq!(
            transform(Algorithm::Aes, Operation::Encrypt, "hello", None),
            Err(CryptoError::WeakKey { min: keys::MIN_SECRET_LEN })
        );
    }
}
