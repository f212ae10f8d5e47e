//! marketboard - A classifieds marketplace backend
//!
//! Four listing collections (classifieds, vacancies, companies and real
//! estate) plus user accounts, each persisted write-through to its own JSON
//! document and served over a JSON HTTP API.

pub mod auth;
pub mod cli;
pub mod http_server;
pub mod resources;
pub mod store;
