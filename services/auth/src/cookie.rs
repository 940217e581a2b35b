//! Session cookie handling
//!
//! The session reference travels only in the `auth_ref` cookie. It is
//! HttpOnly so scripts never see it.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::error::ConfigError;

use crate::session::SessionReference;

/// Name of the cookie carrying the session reference
pub const SESSION_COOKIE: &str = "auth_ref";

/// Cookie attributes
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    /// Send only over HTTPS
    pub secure: bool,
    /// Cookie lifetime, matching the session TTL
    pub max_age_seconds: u64,
}

impl CookieSettings {
    /// Create cookie settings from environment variables
    ///
    /// # Environment Variables
    /// - `COOKIE_SECURE`: set the Secure attribute (default: false)
    pub fn from_env(max_age_seconds: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            secure: common::env_flag("COOKIE_SECURE", false)?,
            max_age_seconds,
        })
    }

    /// Cookie carrying a freshly issued reference
    pub fn session_cookie(&self, reference: SessionReference) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, reference.into_string()))
            .http_only(true)
            .path("/")
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::seconds(
                i64::try_from(self.max_age_seconds).unwrap_or(i64::MAX),
            ))
            .build()
    }

    /// Cookie that makes the browser drop the session cookie
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .http_only(true)
            .path("/")
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }
}

/// Session reference presented by the client, if any
pub fn session_reference(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let settings = CookieSettings {
            secure: false,
            max_age_seconds: 3600,
        };
        let cookie = settings.session_cookie(SessionReference::fixed("abc123"));

        assert_eq!(cookie.name(), "auth_ref");
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
        assert!(!cookie.secure().unwrap_or(false));
    }

    #[test]
    fn secure_flag_follows_settings() {
        let settings = CookieSettings {
            secure: true,
            max_age_seconds: 60,
        };
        let cookie = settings.session_cookie(SessionReference::fixed("abc"));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn reads_reference_from_jar() {
        let jar = CookieJar::new();
        assert_eq!(session_reference(&jar), None);

        let jar = jar.add(Cookie::new(SESSION_COOKIE, "ref42"));
        assert_eq!(session_reference(&jar).as_deref(), Some("ref42"));

        let jar = jar.add(Cookie::new(SESSION_COOKIE, "  "));
        assert_eq!(session_reference(&jar), None);
    }
}
