//! # Marketplace Resources
//!
//! The listing types served under `/api/<path>`. Each type describes its
//! input schema, required fields, update rules and list filters through
//! [`Listing`]; the HTTP layer drives all of them with one set of handlers.

pub mod classified;
pub mod company;
pub mod fields;
pub mod real_estate;
pub mod vacancy;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::store::Resource;

pub use classified::Classified;
pub use company::Company;
pub use fields::Patch;
pub use real_estate::RealEstate;
pub use vacancy::Vacancy;

/// A request body failed the type's field rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// A marketplace resource type with CRUD endpoints
pub trait Listing: Resource {
    /// URL segment under `/api`
    const PATH: &'static str;

    /// JSON key wrapping list responses
    const PLURAL_KEY: &'static str;

    /// JSON key wrapping single-record responses
    const SINGULAR_KEY: &'static str;

    /// Human name used in response messages
    const LABEL: &'static str;

    /// Whether creating a record needs a logged-in session
    const CREATE_REQUIRES_SESSION: bool = false;

    /// POST body
    type Create: DeserializeOwned + Send + 'static;

    /// PUT body; every field optional
    type Update: DeserializeOwned + Send + 'static;

    /// Query-string filters for listing
    type Filter: DeserializeOwned + Default + Send + 'static;

    /// Validate a create request and build the record
    fn build(id: u64, input: Self::Create, now: DateTime<Utc>) -> Result<Self, ValidationError>;

    /// Check an update before it touches the store
    fn check_update(update: &Self::Update) -> Result<(), ValidationError>;

    /// Overwrite the fields the update supplied
    ///
    /// Must leave `id` and `dateCreated` alone.
    fn apply_update(&mut self, update: Self::Update);

    /// Whether this record passes the list filters
    fn matches(&self, filter: &Self::Filter) -> bool;
}
