//! Company key to tenant namespace resolution
//!
//! The mapping is fixed at startup. Lookups are case-insensitive and never
//! touch a store.

use common::{error::ConfigError, tenant::TenantId};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Mapping used when `TENANT_KEYS` is not set
pub const DEFAULT_TENANT_KEYS: &str = "t1=tenant_t1,t2=tenant_t2";

/// The company key does not name a known tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tenant not found")]
pub struct TenantNotFound;

/// Static company key table
#[derive(Debug, Clone)]
pub struct TenantResolver {
    tenants: HashMap<String, TenantId>,
}

impl TenantResolver {
    /// Build a resolver from `(company key, tenant id)` pairs
    pub fn new<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, TenantId)>,
        K: AsRef<str>,
    {
        let tenants = entries
            .into_iter()
            .map(|(key, tenant)| (normalize(key.as_ref()), tenant))
            .collect();

        Self { tenants }
    }

    /// Parse a `key=tenant_id,key=tenant_id` table
    pub fn parse(table: &str) -> Result<Self, ConfigError> {
        let mut entries = Vec::new();

        for pair in table.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, tenant) = pair.split_once('=').ok_or_else(|| {
                ConfigError::new("TENANT_KEYS", format!("expected key=tenant, got {pair:?}"))
            })?;

            let key = key.trim();
            if !is_well_formed_key(key) {
                return Err(ConfigError::new(
                    "TENANT_KEYS",
                    format!("malformed company key {key:?}"),
                ));
            }

            let tenant = TenantId::new(tenant.trim())
                .map_err(|e| ConfigError::new("TENANT_KEYS", e.to_string()))?;
            entries.push((key.to_string(), tenant));
        }

        if entries.is_empty() {
            return Err(ConfigError::new("TENANT_KEYS", "no tenants configured"));
        }

        Ok(Self::new(entries))
    }

    /// Create a resolver from environment variables
    ///
    /// # Environment Variables
    /// - `TENANT_KEYS`: comma separated `key=tenant_id` pairs
    ///   (default: `t1=tenant_t1,t2=tenant_t2`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let table =
            std::env::var("TENANT_KEYS").unwrap_or_else(|_| DEFAULT_TENANT_KEYS.to_string());
        Self::parse(&table)
    }

    /// Resolve a company key to its tenant namespace
    pub fn resolve(&self, company_key: &str) -> Result<TenantId, TenantNotFound> {
        let key = company_key.trim();
        if !is_well_formed_key(key) {
            return Err(TenantNotFound);
        }

        self.tenants
            .get(&normalize(key))
            .cloned()
            .ok_or(TenantNotFound)
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

impl Default for TenantResolver {
    fn default() -> Self {
        // The built-in table is known to parse.
        Self::parse(DEFAULT_TENANT_KEYS).unwrap_or_else(|_| Self::new(Vec::<(String, TenantId)>::new()))
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

fn is_well_formed_key(key: &str) -> bool {
    static KEY_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = KEY_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,32}$").expect("Failed to compile key regex"));
    regex.is_match(key)
}
