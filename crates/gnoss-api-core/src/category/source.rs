//! Category sources
//!
//! Where category directories come from, and an optional snapshot cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::Result;

use super::model::CategoryDirectory;
use super::tree::CategoryTree;

/// Read-only access to the categories of a community.
///
/// Implementations fail with `ScopeNotFound` for unknown communities and
/// with `Transport` for network/HTTP failures. They never retry.
pub trait CategorySource {
    fn fetch_categories(&self, scope: &str) -> Result<CategoryDirectory>;
}

/// Built trees shared across calls, keyed by community.
///
/// Snapshots are immutable. Nothing expires on its own: whoever creates,
/// renames, moves or deletes categories must call [`invalidate`](Self::invalidate).
#[derive(Debug, Default)]
pub struct CategoryCache {
    snapshots: Mutex<HashMap<String, Arc<CategoryTree>>>,
}

impl CategoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached tree for `scope`, fetching and building it on a miss
    pub fn get_or_fetch<S: CategorySource + ?Sized>(
        &self,
        source: &S,
        scope: &str,
    ) -> Result<Arc<CategoryTree>> {
        if let Some(tree) = self.get(scope) {
            return Ok(tree);
        }

        // built outside the lock; a concurrent miss may build it twice
        let tree = Arc::new(CategoryTree::build(source.fetch_categories(scope)?));
        let mut snapshots = self.lock();
        let entry = snapshots
            .entry(scope.to_string())
            .or_insert_with(|| Arc::clone(&tree));
        Ok(Arc::clone(entry))
    }

    /// Cached tree for `scope`, if any
    pub fn get(&self, scope: &str) -> Option<Arc<CategoryTree>> {
        self.lock().get(scope).cloned()
    }

    /// Drop the snapshot of one community
    pub fn invalidate(&self, scope: &str) -> bool {
        let removed = self.lock().remove(scope).is_some();
        if removed {
            tracing::debug!(scope, "category snapshot invalidated");
        }
        removed
    }

    /// Drop every snapshot
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<CategoryTree>>> {
        // snapshots are replaced whole, so a poisoned map is still consistent
        self.snapshots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
