//! Auth HTTP Routes
//!
//! Registration and login on top of [`AuthService`].

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};

use crate::auth::{AuthService, LoginRequest, RegisterRequest, UserProfile, UserSummary};

use super::errors::ApiResult;
use super::response::Envelope;

/// Auth routes with shared state
pub fn auth_routes(auth: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/register", post(register_handler))
        .route("/api/login", post(login_handler))
        .with_state(auth)
}

/// Register handler
async fn register_handler(
    State(auth): State<Arc<AuthService>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Envelope)> {
    let Json(request) = body?;
    let user = auth.register(request)?;

    let envelope = Envelope::new()
        .message("User registered successfully")
        .with("user", UserProfile::from(&user))?;
    Ok((StatusCode::CREATED, envelope))
}

/// Login handler
async fn login_handler(
    State(auth): State<Arc<AuthService>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Envelope> {
    let Json(request) = body?;
    let (token, user) = auth.login(request)?;

    Envelope::new()
        .message("Login successful")
        .with("token", token)?
        .with("user", UserSummary::from(&user))
}
