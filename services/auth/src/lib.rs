//! Authentication service
//!
//! Resolves a company key to its tenant, checks credentials in that tenant's
//! user table and hands out an opaque session reference backed by a signed
//! token in the key-value store.

pub mod cookie;
pub mod credentials;
pub mod error;
pub mod jwt;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod service;
pub mod session;
pub mod tenant;
pub mod validation;

use crate::{cookie::CookieSettings, service::AuthService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub cookies: CookieSettings,
}
