//! # Resource Store Module
//!
//! The repository abstraction shared by every resource type: id allocation,
//! ordered storage with predicate filtering, and write-through persistence of
//! whole-collection snapshots.
//!
//! ## Layout on disk
//!
//! The JSON file adapter keeps one file per collection:
//!
//! ```text
//! <data_dir>/<collection>.json   {"nextId": 4, "items": [...]}
//! ```

pub mod allocator;
pub mod errors;
pub mod persistence;
pub mod resource;

pub use allocator::{IdAllocator, DEFAULT_SEED};
pub use errors::{StoreError, StoreResult};
pub use persistence::{JsonFilePersistence, MemoryPersistence, Persistence};
pub use resource::{CorruptPolicy, Resource, ResourceStore, Snapshot};
