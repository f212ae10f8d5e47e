//! # Resource Store
//!
//! Ordered, write-through collection of typed records for one resource type.
//!
//! ## Invariants
//! - Records keep insertion order; filtering never re-sorts
//! - Every successful mutation is persisted before it becomes visible
//! - A failed persist leaves the in-memory state untouched

use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::allocator::IdAllocator;
use super::errors::{StoreError, StoreResult};
use super::persistence::Persistence;

/// A record type that can live in a [`ResourceStore`]
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Persistence key for the collection, e.g. `"companies"`
    const COLLECTION: &'static str;

    /// The record's immutable id
    fn id(&self) -> u64;
}

/// What to do when stored state exists but cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Log a warning, move the bad snapshot aside and start empty
    #[default]
    Warn,
    /// Refuse to open the store
    Fail,
}

/// Full durable state of one collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<T> {
    pub next_id: IdAllocator,
    pub items: Vec<T>,
}

impl<T> Snapshot<T> {
    fn empty(seed: u64) -> Self {
        Self {
            next_id: IdAllocator::new(seed),
            items: Vec::new(),
        }
    }
}

/// Write-through store for one resource type
#[derive(Debug)]
pub struct ResourceStore<T: Resource> {
    state: RwLock<Snapshot<T>>,
    persistence: Arc<dyn Persistence>,
}

impl<T: Resource> ResourceStore<T> {
    /// Open the store, loading any state previously saved under
    /// [`Resource::COLLECTION`]
    pub fn open(
        persistence: Arc<dyn Persistence>,
        seed: u64,
        policy: CorruptPolicy,
    ) -> StoreResult<Self> {
        let key = T::COLLECTION;
        let snapshot = match persistence.load(key) {
            Ok(Some(contents)) => match serde_json::from_str::<Snapshot<T>>(&contents) {
                Ok(mut snapshot) => {
                    let highest = snapshot.items.iter().map(Resource::id).max().unwrap_or(0);
                    if !snapshot.next_id.resume_above(highest) {
                        let err = StoreError::corrupt(
                            key,
                            format!("stored id {} leaves no ids to allocate", highest),
                        );
                        let snapshot = Self::recover(&*persistence, seed, policy, err)?;
                        return Ok(Self {
                            state: RwLock::new(snapshot),
                            persistence,
                        });
                    }
                    tracing::info!(
                        collection = key,
                        records = snapshot.items.len(),
                        next_id = snapshot.next_id.peek(),
                        "loaded collection"
                    );
                    snapshot
                }
                Err(e) => Self::recover(&*persistence, seed, policy, StoreError::corrupt(key, e))?,
            },
            Ok(None) => {
                tracing::info!(collection = key, "no stored state, starting empty");
                Snapshot::empty(seed)
            }
            Err(e @ StoreError::Corrupt { .. }) => Self::recover(&*persistence, seed, policy, e)?,
            Err(e) => return Err(e),
        };

        Ok(Self {
            state: RwLock::new(snapshot),
            persistence,
        })
    }

    fn recover(
        persistence: &dyn Persistence,
        seed: u64,
        policy: CorruptPolicy,
        err: StoreError,
    ) -> StoreResult<Snapshot<T>> {
        if policy == CorruptPolicy::Fail {
            tracing::error!(collection = T::COLLECTION, error = %err, "refusing to open corrupt collection");
            return Err(err);
        }

        let moved_to = persistence.quarantine(T::COLLECTION)?;
        tracing::warn!(
            collection = T::COLLECTION,
            error = %err,
            moved_to = %moved_to,
            "stored state unreadable, starting empty"
        );
        Ok(Snapshot::empty(seed))
    }

    /// Number of stored records
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.items.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// The id the next created record will receive
    pub fn next_id(&self) -> StoreResult<u64> {
        Ok(self.read()?.next_id.peek())
    }

    /// Look up a record by id
    pub fn find_by_id(&self, id: u64) -> StoreResult<Option<T>> {
        Ok(self.read()?.items.iter().find(|r| r.id() == id).cloned())
    }

    /// All records in insertion order
    pub fn find_all(&self) -> StoreResult<Vec<T>> {
        Ok(self.read()?.items.clone())
    }

    /// Records matching `predicate`, in insertion order
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> StoreResult<Vec<T>> {
        Ok(self
            .read()?
            .items
            .iter()
            .filter(|r| predicate(*r))
            .cloned()
            .collect())
    }

    /// Allocate an id, build a record with it and append it
    pub fn create(&self, build: impl FnOnce(u64) -> T) -> StoreResult<T> {
        self.try_create(|id, _| Ok::<_, StoreError>(build(id)))
    }

    /// Like [`create`](Self::create), but the builder sees the existing
    /// records and may reject the insert
    ///
    /// A rejected build consumes no id.
    pub fn try_create<E>(&self, build: impl FnOnce(u64, &[T]) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        self.write_through(|draft| {
            let id = draft
                .next_id
                .next()
                .ok_or_else(|| StoreError::ids_exhausted(T::COLLECTION))?;
            let record = build(id, &draft.items)?;
            draft.items.push(record.clone());
            Ok((record, true))
        })
    }

    /// Apply `patch` to the record with `id`
    ///
    /// Returns `None` if no such record exists.
    pub fn update(&self, id: u64, patch: impl FnOnce(&mut T)) -> StoreResult<Option<T>> {
        self.write_through(|draft| {
            let Some(record) = draft.items.iter_mut().find(|r| r.id() == id) else {
                return Ok((None, false));
            };
            patch(record);
            Ok((Some(record.clone()), true))
        })
    }

    /// Remove the record with `id`; returns whether one was removed
    pub fn delete(&self, id: u64) -> StoreResult<bool> {
        self.write_through(|draft| {
            let before = draft.items.len();
            draft.items.retain(|r| r.id() != id);
            let removed = draft.items.len() != before;
            Ok((removed, removed))
        })
    }

    /// Run `op` against a copy of the state, persist the copy and commit it
    ///
    /// `op` returns its result and whether it changed anything; unchanged
    /// drafts are dropped without a write. The write lock is held across the
    /// persist so writes to one collection are serialized.
    fn write_through<R, E>(
        &self,
        op: impl FnOnce(&mut Snapshot<T>) -> Result<(R, bool), E>,
    ) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;

        let mut draft = state.clone();
        let (result, changed) = op(&mut draft)?;
        if !changed {
            return Ok(result);
        }

        let encoded = serde_json::to_string_pretty(&draft)
            .map_err(|e| StoreError::encode(T::COLLECTION, e))?;
        if let Err(e) = self.persistence.save(T::COLLECTION, &encoded) {
            tracing::error!(collection = T::COLLECTION, error = %e, "persist failed, mutation discarded");
            return Err(e.into());
        }

        *state = draft;
        Ok(result)
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Snapshot<T>>> {
        self.state.read().map_err(|_| StoreError::LockPoisoned)
    }
}
