//! Session model
//!
//! A session is never stored as a row. It travels as the claims of a signed
//! token, and only that token is kept server-side behind a random reference.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use common::tenant::TenantId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::Identity;
use super::user::UserId;

/// Longest session lifetime accepted anywhere in the service
pub const MAX_SESSION_TTL_SECONDS: u64 = 366 * 24 * 60 * 60;

/// Session payload, serialized as JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Random session id, safe to log
    #[serde(rename = "jti")]
    pub id: Uuid,
    #[serde(rename = "uid")]
    pub user_id: UserId,
    pub username: String,
    #[serde(rename = "tenant")]
    pub tenant_id: TenantId,
    pub role: String,
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Start a session for `identity` lasting `ttl_seconds` from now
    ///
    /// Timestamps are whole seconds so the session survives a round trip
    /// through its token unchanged.
    pub fn new(identity: &Identity, ttl_seconds: u64) -> Self {
        let issued_at = Utc::now().trunc_subsecs(0);
        let ttl = Duration::seconds(ttl_seconds.min(MAX_SESSION_TTL_SECONDS) as i64);

        Self {
            id: Uuid::new_v4(),
            user_id: identity.user_id,
            username: identity.username.clone(),
            tenant_id: identity.tenant_id.clone(),
            role: identity.role.clone(),
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            username: self.username.clone(),
            tenant_id: self.tenant_id.clone(),
            role: self.role.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            user_id: 7,
            username: "dev_t2".to_string(),
            tenant_id: TenantId::new("tenant_t2").unwrap(),
            role: "Developer".to_string(),
        }
    }

    #[test]
    fn new_session_carries_identity_and_ttl() {
        let session = Session::new(&identity(), 3600);
        assert_eq!(session.identity(), identity());
        assert_eq!((session.expires_at - session.issued_at).num_seconds(), 3600);
    }

    #[test]
    fn timestamps_serialize_as_unix_seconds() {
        let session = Session::new(&identity(), 60);
        let claims = serde_json::to_value(&session).unwrap();
        assert_eq!(claims["exp"].as_i64(), Some(session.expires_at.timestamp()));
        assert_eq!(claims["iat"].as_i64(), Some(session.issued_at.timestamp()));
        assert_eq!(claims["tenant"], "tenant_t2");
    }
}
