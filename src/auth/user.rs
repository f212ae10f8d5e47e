//! # Users
//!
//! User record and the request/response shapes for registration and login.
//! Users are stored in the `users` collection like any other resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Resource;

/// Role given to users who register without one
pub const DEFAULT_ROLE: &str = "user";

/// User record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,

    /// Unique login name
    pub username: String,

    /// Stored as given, not hashed
    pub password: String,

    pub role: String,

    pub date_created: DateTime<Utc>,
}

impl Resource for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> u64 {
        self.id
    }
}

/// Registration request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Public view of a freshly registered user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub role: String,
    pub date_created: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
            date_created: user.date_created,
        }
    }
}

/// User summary returned on login
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub username: String,
    pub role: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}
