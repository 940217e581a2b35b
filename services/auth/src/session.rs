//! Session reference indirection
//!
//! The client holds a random reference; the signed session token lives in the
//! key-value store under that reference with a TTL. Deleting the key revokes
//! the session immediately on every instance sharing the store.

use common::{
    cache::KeyValueStore,
    error::ConfigError,
    timeout::{DEFAULT_STORE_TIMEOUT, bounded},
};
use rand::{Rng, distributions::Alphanumeric};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{
    error::AuthError,
    jwt::JwtService,
    models::{Session, session::MAX_SESSION_TTL_SECONDS},
};

/// Key prefix for reference → token entries
pub const SESSION_KEY_PREFIX: &str = "session_ref:";

/// Default session lifetime (1 hour)
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 3600;

/// Length of a generated reference; 48 alphanumeric chars is ~285 bits
const REFERENCE_LENGTH: usize = 48;

/// Longest reference accepted from a client
const MAX_REFERENCE_LENGTH: usize = 128;

/// Opaque, unguessable session capability handed to the client
#[derive(Clone, PartialEq, Eq)]
pub struct SessionReference(String);

impl SessionReference {
    fn generate() -> Self {
        let value: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(REFERENCE_LENGTH)
            .map(char::from)
            .collect();
        Self(value)
    }

    #[cfg(test)]
    pub(crate) fn fixed(value: &str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

// References are credentials: keep them out of logs.
impl fmt::Debug for SessionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionReference(..)")
    }
}

/// Session store settings
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Reference lifetime in seconds
    pub ttl_seconds: u64,
    /// Bound on each key-value store round trip
    pub store_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

impl SessionConfig {
    /// Create a new SessionConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SESSION_TTL_SECONDS`: session lifetime (default: 3600)
    /// - `STORE_TIMEOUT_MS`: store round-trip bound (default: 3000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let ttl_seconds = common::env_or("SESSION_TTL_SECONDS", DEFAULT_SESSION_TTL_SECONDS)?;
        if ttl_seconds == 0 || ttl_seconds > MAX_SESSION_TTL_SECONDS {
            return Err(ConfigError::new(
                "SESSION_TTL_SECONDS",
                format!("must be between 1 and {MAX_SESSION_TTL_SECONDS}"),
            ));
        }

        Ok(Self {
            ttl_seconds,
            store_timeout: common::timeout::store_timeout_from_env()?,
        })
    }
}

/// Maps opaque references to signed session tokens
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    jwt: JwtService,
    store_timeout: Duration,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>, jwt: JwtService, store_timeout: Duration) -> Self {
        Self {
            store,
            jwt,
            store_timeout,
        }
    }

    /// Sign `session` and register it under a fresh reference
    pub async fn create(
        &self,
        session: &Session,
        ttl_seconds: u64,
    ) -> Result<SessionReference, AuthError> {
        let token = self.jwt.sign(session).map_err(AuthError::Signing)?;
        let reference = SessionReference::generate();

        bounded(
            self.store_timeout,
            self.store
                .set(&key_for(reference.as_str()), &token, Some(ttl_seconds)),
        )
        .await?;

        info!(session_id = %session.id, user_id = session.user_id, "Session created");
        Ok(reference)
    }

    /// Look up and verify the session behind `reference`
    ///
    /// Missing, expired and tampered sessions all come back as `None`.
    pub async fn resolve(&self, reference: &str) -> Result<Option<Session>, AuthError> {
        if !is_plausible_reference(reference) {
            debug!("Rejected malformed session reference");
            return Ok(None);
        }

        let token = bounded(self.store_timeout, self.store.get(&key_for(reference))).await?;
        let Some(token) = token else {
            debug!("Session reference not found or expired");
            return Ok(None);
        };

        match self.jwt.verify(&token) {
            Ok(session) => Ok(Some(session)),
            Err(e) if e.is_expired() => {
                debug!("Session token expired");
                Ok(None)
            }
            Err(e) => {
                warn!("Session token failed verification: {}", e);
                Ok(None)
            }
        }
    }

    /// Delete the reference; absent references are fine
    pub async fn revoke(&self, reference: &str) -> Result<(), AuthError> {
        if !is_plausible_reference(reference) {
            return Ok(());
        }

        bounded(self.store_timeout, self.store.delete(&key_for(reference))).await?;
        info!("Session revoked");
        Ok(())
    }

    /// Check if the key-value store is reachable
    pub async fn health_check(&self) -> bool {
        matches!(
            bounded(self.store_timeout, self.store.health_check()).await,
            Ok(true)
        )
    }
}

fn key_for(reference: &str) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, reference)
}

fn is_plausible_reference(reference: &str) -> bool {
    !reference.is_empty()
        && reference.len() <= MAX_REFERENCE_LENGTH
        && reference.bytes().all(|b| b.is_ascii_alphanumeric())
}
