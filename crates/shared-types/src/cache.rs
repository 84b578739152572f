//! # Client Entity Store
//!
//! Clients never own claims or listings; they hold cached copies. The only
//! ways to change the cache are:
//!
//! - `replace_all`: full re-fetch after a refresh (no incremental merging)
//! - `patch_by_id`: apply a change the gateway has just confirmed
//!
//! No `insert` or `remove`: speculative UI edits never reach the cache.

use crate::entities::{ClaimId, ClaimRecord, FoodId, FoodItem};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;

/// An entity addressable by a stable id.
pub trait Keyed {
    type Key: Clone + Eq + Hash;

    fn key(&self) -> &Self::Key;
}

impl Keyed for ClaimRecord {
    type Key = ClaimId;

    fn key(&self) -> &ClaimId {
        &self.id
    }
}

impl Keyed for FoodItem {
    type Key = FoodId;

    fn key(&self) -> &FoodId {
        &self.id
    }
}

struct Inner<T: Keyed> {
    /// Server order is preserved for stable sorting downstream.
    items: Vec<T>,
    index: HashMap<T::Key, usize>,
}

/// Reconciled cache of gateway-owned entities.
pub struct EntityCache<T: Keyed> {
    inner: RwLock<Inner<T>>,
}

impl<T: Keyed + Clone> EntityCache<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                items: Vec::new(),
                index: HashMap::new(),
            }),
        }
    }

    /// Replaces the whole cache with a fresh server listing.
    pub fn replace_all(&self, items: Vec<T>) {
        let index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.key().clone(), i))
            .collect();
        let mut inner = self.inner.write();
        inner.items = items;
        inner.index = index;
    }

    /// Applies `patch` to the cached entity. Returns false if it is not cached;
    /// the caller should then refresh.
    pub fn patch_by_id<F>(&self, id: &T::Key, patch: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let mut inner = self.inner.write();
        let Some(&pos) = inner.index.get(id) else {
            return false;
        };
        match inner.items.get_mut(pos) {
            Some(item) => {
                patch(item);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &T::Key) -> Option<T> {
        let inner = self.inner.read();
        inner.index.get(id).and_then(|&i| inner.items.get(i).cloned())
    }

    /// Copy of all cached entities in server order.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.read().items.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Keyed + Clone> Default for EntityCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
