//! Project API service
//!
//! Serves the paginated, searchable list of projects a logged-in user has
//! been granted access to within their own tenant.

pub mod error;
pub mod middleware;
pub mod models;
pub mod projects;
pub mod repositories;
pub mod routes;
pub mod state;

pub use state::AppState;
