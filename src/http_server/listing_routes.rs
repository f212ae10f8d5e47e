//! Listing HTTP Routes
//!
//! CRUD endpoints shared by every [`Listing`] type:
//!
//! - `GET    /api/<path>`      list, filtered by query string
//! - `POST   /api/<path>`      create
//! - `GET    /api/<path>/:id`  fetch
//! - `PUT    /api/<path>/:id`  partial update
//! - `DELETE /api/<path>/:id`  delete

use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Json, Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::get,
    Router,
};
use chrono::Utc;

use crate::auth::AuthService;
use crate::resources::Listing;
use crate::store::{ResourceStore, StoreResult};

use super::errors::{ApiError, ApiResult};
use super::observability_routes::CollectionStats;
use super::response::Envelope;

/// Per-type handler state
#[derive(Debug)]
pub struct ListingState<L: Listing> {
    pub store: ResourceStore<L>,
    pub auth: Arc<AuthService>,
    /// Enforce [`Listing::CREATE_REQUIRES_SESSION`]
    pub protect_create: bool,
}

impl<L: Listing> ListingState<L> {
    pub fn new(store: ResourceStore<L>, auth: Arc<AuthService>, protect_create: bool) -> Self {
        Self {
            store,
            auth,
            protect_create,
        }
    }
}

impl<L: Listing> CollectionStats for ListingState<L> {
    fn collection(&self) -> &'static str {
        L::COLLECTION
    }

    fn count(&self) -> StoreResult<usize> {
        self.store.len()
    }
}

/// Routes for one listing type
pub fn listing_routes<L: Listing>(state: Arc<ListingState<L>>) -> Router {
    let collection = format!("/api/{}", L::PATH);
    let member = format!("/api/{}/:id", L::PATH);

    Router::new()
        .route(&collection, get(list_handler::<L>).post(create_handler::<L>))
        .route(
            &member,
            get(get_handler::<L>)
                .put(update_handler::<L>)
                .delete(delete_handler::<L>),
        )
        .with_state(state)
}

async fn list_handler<L: Listing>(
    State(state): State<Arc<ListingState<L>>>,
    query: Result<Query<L::Filter>, QueryRejection>,
) -> ApiResult<Envelope> {
    let Query(filter) = query?;
    let items = state.store.filter(|record| record.matches(&filter))?;
    Envelope::new().with(L::PLURAL_KEY, items)
}

async fn create_handler<L: Listing>(
    State(state): State<Arc<ListingState<L>>>,
    headers: HeaderMap,
    body: Result<Json<L::Create>, JsonRejection>,
) -> ApiResult<(StatusCode, Envelope)> {
    // The session gate runs before the body is looked at.
    if L::CREATE_REQUIRES_SESSION && state.protect_create {
        let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        let identity = state.auth.authenticate(authorization)?;
        tracing::debug!(collection = L::COLLECTION, user_id = identity.user_id, "create authorized");
    }

    let Json(input) = body?;
    let record = state
        .store
        .try_create(|id, _| L::build(id, input, Utc::now()).map_err(ApiError::from))?;

    tracing::info!(collection = L::COLLECTION, id = record.id(), "record created");
    let envelope = Envelope::new()
        .message(format!("{} created successfully", L::LABEL))
        .with(L::SINGULAR_KEY, record)?;
    Ok((StatusCode::CREATED, envelope))
}

async fn get_handler<L: Listing>(
    State(state): State<Arc<ListingState<L>>>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Envelope> {
    let Path(id) = id?;
    let record = state
        .store
        .find_by_id(id)?
        .ok_or(ApiError::NotFound(L::LABEL))?;
    Envelope::new().with(L::SINGULAR_KEY, record)
}

async fn update_handler<L: Listing>(
    State(state): State<Arc<ListingState<L>>>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<L::Update>, JsonRejection>,
) -> ApiResult<Envelope> {
    let Path(id) = id?;
    let Json(update) = body?;
    L::check_update(&update)?;

    let record = state
        .store
        .update(id, |record| record.apply_update(update))?
        .ok_or(ApiError::NotFound(L::LABEL))?;

    tracing::info!(collection = L::COLLECTION, id, "record updated");
    Envelope::new()
        .message(format!("{} updated successfully", L::LABEL))
        .with(L::SINGULAR_KEY, record)
}

async fn delete_handler<L: Listing>(
    State(state): State<Arc<ListingState<L>>>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Envelope> {
    let Path(id) = id?;
    if !state.store.delete(id)? {
        return Err(ApiError::NotFound(L::LABEL));
    }

    tracing::info!(collection = L::COLLECTION, id, "record deleted");
    Ok(Envelope::new().message(format!("{} deleted successfully", L::LABEL)))
}
