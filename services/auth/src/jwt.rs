//! Signed session tokens
//!
//! A [`Session`] is encoded as JWT claims. HS256 with a shared secret is the
//! default; RS256 is used when a PEM key pair is configured. The token never
//! leaves the server: clients only ever see the session reference that
//! points at it.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use tracing::warn;

use crate::models::Session;
use common::error::ConfigError;

const DEVELOPMENT_SECRET: &str = "development-only-session-secret";

/// Token signing or verification failure
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid signing key: {0}")]
    Key(String),

    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl TokenError {
    pub fn is_expired(&self) -> bool {
        matches!(
            self,
            TokenError::Jwt(e) if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature)
        )
    }
}

/// Key material for signing session tokens
#[derive(Clone)]
pub enum JwtKeys {
    /// HS256 shared secret
    Secret(String),
    /// RS256 key pair, PEM encoded
    Rsa {
        private_key: String,
        public_key: String,
    },
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtKeys::Secret(_) => f.write_str("JwtKeys::Secret(..)"),
            JwtKeys::Rsa { .. } => f.write_str("JwtKeys::Rsa { .. }"),
        }
    }
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub keys: JwtKeys,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_PRIVATE_KEY` / `JWT_PUBLIC_KEY`: RS256 key pair (PEM or path to a
    ///   PEM file); both must be set to select RS256
    /// - `JWT_SECRET`: HS256 secret, used otherwise
    pub fn from_env() -> Result<Self, ConfigError> {
        let private_key = std::env::var("JWT_PRIVATE_KEY").ok();
        let public_key = std::env::var("JWT_PUBLIC_KEY").ok();

        let keys = match (private_key, public_key) {
            (Some(private_key), Some(public_key)) => JwtKeys::Rsa {
                private_key: read_key_material("JWT_PRIVATE_KEY", private_key)?,
                public_key: read_key_material("JWT_PUBLIC_KEY", public_key)?,
            },
            (Some(_), None) | (None, Some(_)) => {
                return Err(ConfigError::new(
                    "JWT_PRIVATE_KEY",
                    "JWT_PRIVATE_KEY and JWT_PUBLIC_KEY must be set together",
                ));
            }
            (None, None) => match std::env::var("JWT_SECRET") {
                Ok(secret) if !secret.trim().is_empty() => JwtKeys::Secret(secret),
                _ => {
                    warn!("JWT_SECRET not set, using the development secret");
                    JwtKeys::Secret(DEVELOPMENT_SECRET.to_string())
                }
            },
        };

        Ok(JwtConfig { keys })
    }

    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            keys: JwtKeys::Secret(secret.into()),
        }
    }
}

/// If the value looks like a file path, read from file (try CWD, then crate root)
fn read_key_material(var: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with("-----BEGIN") {
        return Ok(value);
    }

    std::fs::read_to_string(&value)
        .or_else(|_| {
            let mut path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
            path.push(&value);
            std::fs::read_to_string(path)
        })
        .map(|pem| pem.trim().to_string())
        .map_err(|e| ConfigError::new(var, format!("failed to read key file: {}", e)))
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct JwtService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self, TokenError> {
        let (algorithm, encoding_key, decoding_key) = match &config.keys {
            JwtKeys::Secret(secret) => {
                if secret.is_empty() {
                    return Err(TokenError::Key("empty HS256 secret".to_string()));
                }
                (
                    Algorithm::HS256,
                    EncodingKey::from_secret(secret.as_bytes()),
                    DecodingKey::from_secret(secret.as_bytes()),
                )
            }
            JwtKeys::Rsa {
                private_key,
                public_key,
            } => (
                Algorithm::RS256,
                EncodingKey::from_rsa_pem(private_key.as_bytes())?,
                DecodingKey::from_rsa_pem(public_key.as_bytes())?,
            ),
        };

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(JwtService {
            algorithm,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Sign a session into a compact token
    pub fn sign(&self, session: &Session) -> Result<String, TokenError> {
        let token = encode(&Header::new(self.algorithm), session, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify signature and expiry and return the session
    pub fn verify(&self, token: &str) -> Result<Session, TokenError> {
        let token_data = decode::<Session>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}
