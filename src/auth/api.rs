//! # Auth Service
//!
//! Registration, login and the session gate used by protected operations.

use std::sync::Arc;

use chrono::Utc;

use crate::store::ResourceStore;

use super::crypto::constant_time_str_eq;
use super::errors::{AuthError, AuthResult};
use super::session::{SessionIdentity, SessionRegistry};
use super::user::{LoginRequest, RegisterRequest, User, DEFAULT_ROLE};

/// Auth service over the user store and a session registry
#[derive(Debug)]
pub struct AuthService {
    users: ResourceStore<User>,
    sessions: Arc<dyn SessionRegistry>,
}

impl AuthService {
    pub fn new(users: ResourceStore<User>, sessions: Arc<dyn SessionRegistry>) -> Self {
        Self { users, sessions }
    }

    /// Register a new user
    ///
    /// The uniqueness check runs inside the store's write section, so two
    /// concurrent registrations of one name cannot both succeed.
    pub fn register(&self, request: RegisterRequest) -> AuthResult<User> {
        let username = present(request.username).ok_or(AuthError::MissingCredentials)?;
        let password = present(request.password).ok_or(AuthError::MissingCredentials)?;
        let role = present(request.role).unwrap_or_else(|| DEFAULT_ROLE.to_string());

        let user = self.users.try_create(|id, existing| {
            if existing.iter().any(|u| u.username == username) {
                return Err(AuthError::UsernameTaken);
            }
            Ok(User {
                id,
                username,
                password,
                role,
                date_created: Utc::now(),
            })
        })?;

        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Check credentials and open a session
    pub fn login(&self, request: LoginRequest) -> AuthResult<(String, User)> {
        let username = present(request.username).ok_or(AuthError::MissingCredentials)?;
        let password = present(request.password).ok_or(AuthError::MissingCredentials)?;

        let user = self
            .users
            .filter(|u| u.username == username)?
            .into_iter()
            .next()
            .ok_or(AuthError::InvalidCredentials)?;

        if !constant_time_str_eq(&user.password, &password) {
            tracing::debug!(username = %username, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.sessions.create(SessionIdentity {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
        })?;

        tracing::info!(user_id = user.id, "session opened");
        Ok((token, user))
    }

    /// Resolve the `Authorization` header value to a session identity
    ///
    /// Accepts the raw token or `Bearer <token>`.
    pub fn authenticate(&self, authorization: Option<&str>) -> AuthResult<SessionIdentity> {
        let header = authorization
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(AuthError::AuthenticationRequired)?;
        let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();

        self.sessions
            .resolve(token)?
            .ok_or(AuthError::InvalidToken)
    }

    pub fn users(&self) -> &ResourceStore<User> {
        &self.users
    }
}

/// A field counts as present when it is supplied and non-empty
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::InMemorySessionRegistry;
    use crate::store::{CorruptPolicy, MemoryPersistence};

    fn service() -> AuthService {
        let users =
            ResourceStore::open(Arc::new(MemoryPersistence::new()), 1, CorruptPolicy::Warn)
                .unwrap();
        AuthService::new(users, Arc::new(InMemorySessionRegistry::new()))
    }

    fn register(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
            role: None,
        }
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn test_register_defaults_role() {
        let service = service();
        let user = service.register(register("alice", "pw")).unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.role, "user");
    }

    #[test]
    fn test_register_duplicate_username() {
        let service = service();
        service.register(register("alice", "pw")).unwrap();

        let result = service.register(register("alice", "other"));
        assert!(matches!(result, Err(AuthError::UsernameTaken)));
        assert_eq!(service.users().len().unwrap(), 1);
    }

    #[test]
    fn test_register_requires_both_fields() {
        let service = service();
        let mut request = register("alice", "");
        assert!(matches!(
            service.register(request.clone()),
            Err(AuthError::MissingCredentials)
        ));

        request.password = Some("pw".to_string());
        request.username = None;
        assert!(matches!(service.register(request), Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_login_and_authenticate() {
        let service = service();
        service.register(register("alice", "pw")).unwrap();

        let (token, user) = service.login(login("alice", "pw")).unwrap();
        assert_eq!(user.username, "alice");

        let identity = service.authenticate(Some(&token)).unwrap();
        assert_eq!(identity.username, "alice");

        let bearer = format!("Bearer {}", token);
        assert_eq!(service.authenticate(Some(&bearer)).unwrap().user_id, 1);
    }

    #[test]
    fn test_login_rejects_wrong_password_and_unknown_user() {
        let service = service();
        service.register(register("alice", "pw")).unwrap();

        assert!(matches!(
            service.login(login("alice", "nope")),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login(login("bob", "pw")),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_without_or_with_bad_token() {
        let service = service();

        assert!(matches!(
            service.authenticate(None),
            Err(AuthError::AuthenticationRequired)
        ));
        assert!(matches!(
            service.authenticate(Some("  ")),
            Err(AuthError::AuthenticationRequired)
        ));
        assert!(matches!(
            service.authenticate(Some("forged")),
            Err(AuthError::InvalidToken)
        ));
    }
}
