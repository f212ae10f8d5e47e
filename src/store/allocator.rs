//! # Identifier Allocator
//!
//! Per-collection monotonic id counter.
//!
//! ## Invariants
//! - Ids are strictly increasing and never reused, even after deletion
//! - The counter never decreases, including across restarts

use serde::{Deserialize, Serialize};

/// Default first id for a fresh collection
pub const DEFAULT_SEED: u64 = 1;

/// Monotonic id counter for one collection
///
/// Serialized transparently as the `nextId` number of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create an allocator whose first issued id is `seed`
    pub fn new(seed: u64) -> Self {
        Self { next: seed.max(1) }
    }

    /// Issue the next id, or `None` once the id space is used up
    pub fn next(&mut self) -> Option<u64> {
        let following = self.next.checked_add(1)?;
        let id = self.next;
        self.next = following;
        Some(id)
    }

    /// The id that the next call to [`next`](Self::next) will return
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Raise the counter above `highest` if it is not already
    ///
    /// Used on load so a hand-edited or stale `nextId` cannot collide with
    /// stored records. Returns `false`, leaving the counter unchanged, when
    /// no id above `highest` exists.
    pub fn resume_above(&mut self, highest: u64) -> bool {
        if self.next > highest {
            return true;
        }
        match highest.checked_add(1) {
            Some(next) => {
                self.next = next;
                true
            }
            None => false,
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
