//! Tenant namespace identifiers
//!
//! Every tenant owns a PostgreSQL schema. A [`TenantId`] is the schema name,
//! so it is validated once at construction and can be spliced into SQL as a
//! quoted identifier afterwards.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Rejected tenant identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tenant identifier: {0:?}")]
pub struct InvalidTenantId(pub String);

/// Internal tenant namespace identifier (e.g. `tenant_t1`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Validate and wrap a schema name
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidTenantId> {
        let id = id.into();

        static TENANT_ID_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = TENANT_ID_REGEX.get_or_init(|| {
            Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("Failed to compile tenant id regex")
        });

        if regex.is_match(&id) {
            Ok(Self(id))
        } else {
            Err(InvalidTenantId(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Schema-qualified, quoted table name for this tenant
    pub fn table(&self, table: &str) -> String {
        format!("\"{}\".\"{}\"", self.0, table)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TenantId {
    type Error = InvalidTenantId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}
