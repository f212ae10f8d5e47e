//! # Marketboard HTTP Server Module
//!
//! Combines all endpoint routers into one axum server.
//!
//! # Endpoints
//!
//! - `/health` - Health check with record counts
//! - `/api/register`, `/api/login` - Accounts and sessions
//! - `/api/classifieds`, `/api/vacancies`, `/api/companies`,
//!   `/api/real-estate` - Listing CRUD

pub mod auth_routes;
pub mod config;
pub mod errors;
pub mod listing_routes;
pub mod observability_routes;
pub mod response;
pub mod server;

pub use config::{ServerConfig, StorageBackend};
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
