//! Keyed hash strategy
//!
//! Values are digested with HMAC-SHA256 under `redaction.hash_key`, so equal
//! inputs map to equal tokens across runs that share the key while the
//! plaintext cannot be recovered without it.

use crate::config::SecretString;
use crate::domain::{EntityType, RedactorError, Result};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 hasher with a truncated token form
#[derive(Clone)]
pub struct KeyedHasher {
    mac: HmacSha256,
    length: usize,
}

impl KeyedHasher {
    /// # Errors
    ///
    /// Returns a configuration error for an empty key.
    pub fn new(key: &SecretString, length: usize) -> Result<Self> {
        let bytes = key.expose_secret().as_bytes();
        if bytes.is_empty() {
            return Err(RedactorError::Configuration(
                "redaction.hash_key cannot be empty".to_string(),
            ));
        }
        let mac = HmacSha256::new_from_slice(bytes).map_err(|e| {
            RedactorError::Configuration(format!("Failed to initialize HMAC-SHA256: {e}"))
        })?;
        Ok(Self {
            mac,
            length: length.clamp(1, 64),
        })
    }

    /// Full 64-character hex digest of `value`
    pub fn digest(&self, value: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(value.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// In-cell token, e.g. `[SSN:3f2a9c1d0b7e4a55]`
    pub fn token(&self, entity_type: &EntityType, digest: &str) -> String {
        let short = digest.get(..self.length).unwrap_or(digest);
        format!("[{entity_type}:{short}]")
    }
}

impl std::fmt::Debug for KeyedHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedHasher")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn hasher(key: &str) -> KeyedHasher {
        KeyedHasher::new(&secret_string(key.to_string()), 16).unwrap()
    }

    #[test]
    fn test_digest_is_deterministic() {
        let h = hasher("run-key");
        assert_eq!(h.digest("123-45-6789"), h.digest("123-45-6789"));
        assert_ne!(h.digest("123-45-6789"), h.digest("123-45-6780"));
        assert_eq!(h.digest("x").len(), 64);
    }

    #[test]
    fn test_key_changes_digest() {
        assert_ne!(hasher("a").digest("Jane"), hasher("b").digest("Jane"));
    }

    #[test]
    fn test_token_truncates() {
        let h = hasher("run-key");
        let ssn = EntityType::new("SSN").unwrap();
        let digest = h.digest("123-45-6789");
        let token = h.token(&ssn, &digest);
        assert_eq!(token, format!("[SSN:{}]", &digest[..16]));
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = KeyedHasher::new(&secret_string(String::new()), 16).unwrap_err();
        assert!(err.is_fatal());
    }
}
