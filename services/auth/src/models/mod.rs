//! Authentication service models

pub mod identity;
pub mod session;
pub mod user;

// Re-export for convenience
pub use identity::Identity;
pub use session::Session;
pub use user::{User, UserId};
