//! # Session Registry
//!
//! Maps opaque bearer tokens to the identity that logged in.
//! Tokens have no expiry and live only as long as the registry.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use super::crypto::generate_token;
use super::errors::{AuthError, AuthResult};

/// Identity attached to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub user_id: u64,
    pub username: String,
    pub role: String,
}

/// Session registry trait
///
/// Controllers only depend on this trait, so a persistent or expiring
/// registry can replace the in-memory one.
pub trait SessionRegistry: Send + Sync + std::fmt::Debug {
    /// Start a session and return its token
    fn create(&self, identity: SessionIdentity) -> AuthResult<String>;

    /// Identity for `token`, if the session exists
    fn resolve(&self, token: &str) -> AuthResult<Option<SessionIdentity>>;
}

/// In-memory session registry
#[derive(Debug, Default)]
pub struct InMemorySessionRegistry {
    sessions: RwLock<HashMap<String, SessionIdentity>>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionRegistry for InMemorySessionRegistry {
    fn create(&self, identity: SessionIdentity) -> AuthResult<String> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::Registry("Lock poisoned".to_string()))?;

        let token = generate_token();
        sessions.insert(token.clone(), identity);
        Ok(token)
    }

    fn resolve(&self, token: &str) -> AuthResult<Option<SessionIdentity>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| AuthError::Registry("Lock poisoned".to_string()))?;
        Ok(sessions.get(token).cloned())
    }
}
