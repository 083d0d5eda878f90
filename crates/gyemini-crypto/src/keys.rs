use aes_gcm::aead::OsRng;
use aes_gcm::aead::rand_core::RngCore;
use sha2::Sha256;

use crate::{CryptoError, Result};

pub const MIN_SECRET_LEN: usize = 8;
pub const SALT_LEN: usize = 16;
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// Random salt for one encryption.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Stretch a user secret into a 256-bit AES key with PBKDF2-HMAC-SHA256.
pub fn derive_key(secret: &str, salt: &[u8]) -> Result<[u8; 32]> {
    if secret.chars().count() < MIN_SECRET_LEN {
        return Err(CryptoError::WeakKey { min: MIN_SECRET_LEN });
    }

    let mut key = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(secret.as_bytes(), salt, PBKDF2_ROUNDS, &mut key);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_key() {
        let salt = [7u8; SALT_LEN];
        assert_eq!(derive_key("password1", &salt), derive_key("password1", &salt));
    }

    #[test]
    fn salt_changes_key() {
        let a = derive_key("password1", &[1u8; SALT_LEN]).unwrap();
        let b = derive_key("password1", &[2u8; SALT_LEN]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn short_secret_rejected() {
        assert_eq!(
            derive_key("short", &generate_salt()),
            Err(CryptoError::WeakKey { min: MIN_SECRET_LEN })
        );
    }
}
