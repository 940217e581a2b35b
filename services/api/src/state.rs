//! Application state shared across handlers

use auth::session::SessionStore;

use crate::projects::ProjectService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub projects: ProjectService,
    pub sessions: SessionStore,
}
