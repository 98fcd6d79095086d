// handlers/public/mod.rs - Public handlers (no credentials required)
//
// Security Level: None
// Routes: GET on every collection, POST /users (registration), /health
//
// Nothing served from here may carry a password hash: user records are
// always converted to Profile before leaving the service layer.

pub mod boards;
pub mod comments;
pub mod health;
pub mod popular;
pub mod posts;
pub mod users;
