//! # Marketboard Auth Module
//!
//! User registration, login and the bearer-token session registry that
//! guards protected operations.

pub mod api;
pub mod crypto;
pub mod errors;
pub mod session;
pub mod user;

pub use api::AuthService;
pub use errors::{AuthError, AuthResult};
pub use session::{InMemorySessionRegistry, SessionIdentity, SessionRegistry};
pub use user::{LoginRequest, RegisterRequest, User, UserProfile, UserSummary};
