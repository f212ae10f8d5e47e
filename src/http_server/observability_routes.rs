//! Observability HTTP Routes
//!
//! Health check reporting per-collection record counts.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::auth::{AuthService, User};
use crate::store::{Resource, StoreResult};

use super::errors::ApiResult;

/// Record count of one collection
pub trait CollectionStats: Send + Sync {
    fn collection(&self) -> &'static str;
    fn count(&self) -> StoreResult<usize>;
}

impl CollectionStats for AuthService {
    fn collection(&self) -> &'static str {
        User::COLLECTION
    }

    fn count(&self) -> StoreResult<usize> {
        self.users().len()
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub collections: BTreeMap<&'static str, usize>,
}

/// Collections reported by `/health`
pub type HealthState = Arc<Vec<Arc<dyn CollectionStats>>>;

/// Health check route
pub fn health_routes(collections: Vec<Arc<dyn CollectionStats>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(Arc::new(collections))
}

async fn health_handler(State(collections): State<HealthState>) -> ApiResult<Json<HealthResponse>> {
    let mut counts = BTreeMap::new();
    for stats in collections.iter() {
        counts.insert(stats.collection(), stats.count()?);
    }

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        collections: counts,
    }))
}
