//! Password hashing policy
//!
//! New hashes are salted Argon2 PHC strings. Deployments migrating from the
//! legacy schema can additionally accept unsalted MD5 hex digests.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use md5::{Digest, Md5};
use std::sync::OnceLock;
use tracing::warn;

use common::error::ConfigError;

/// Which stored hash formats are accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordPolicy {
    /// Argon2 PHC strings only
    #[default]
    Argon2,
    /// Argon2, plus legacy 32-char MD5 hex digests
    Argon2WithLegacyMd5,
}

impl PasswordPolicy {
    /// Create the policy from environment variables
    ///
    /// # Environment Variables
    /// - `PASSWORD_LEGACY_MD5`: accept legacy MD5 digests (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        if common::env_flag("PASSWORD_LEGACY_MD5", false)? {
            warn!("Legacy unsalted MD5 password hashes are accepted");
            Ok(PasswordPolicy::Argon2WithLegacyMd5)
        } else {
            Ok(PasswordPolicy::Argon2)
        }
    }

    /// Check `password` against a stored hash
    ///
    /// Unparsable or disallowed hash formats simply fail verification.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        if stored_hash.starts_with('$') {
            return match PasswordHash::new(stored_hash) {
                Ok(parsed) => Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(e) => {
                    warn!("Stored password hash could not be parsed: {}", e);
                    false
                }
            };
        }

        match self {
            PasswordPolicy::Argon2WithLegacyMd5 if is_legacy_md5(stored_hash) => {
                constant_time_eq(legacy_md5_hex(password).as_bytes(), stored_hash.as_bytes())
            }
            _ => false,
        }
    }

    /// Spend the same work as a real verification, for lookups that missed
    pub fn verify_dummy(&self, password: &str) {
        static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
        let dummy = DUMMY_HASH.get_or_init(|| hash_password("not-a-real-password").ok());

        if let Some(hash) = dummy {
            let _ = self.verify(password, hash);
        }
    }
}

/// Produce a salted Argon2 hash for provisioning
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Unsalted MD5 hex digest used by the legacy schema
pub fn legacy_md5_hex(password: &str) -> String {
    format!("{:x}", Md5::digest(password.as_bytes()))
}

fn is_legacy_md5(stored_hash: &str) -> bool {
    stored_hash.len() == 32
        && stored_hash
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
