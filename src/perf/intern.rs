//! Bounded string interning for values that repeat across many documents.

use ahash::RandomState;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shares one allocation per distinct string, up to `max_size` distinct strings.
///
/// Once full, the cache stops growing: new values are handed back uncached and
/// nothing is evicted.
#[derive(Debug)]
pub struct StringInternCache {
    map: DashMap<Arc<str>, (), RandomState>,
    size: AtomicUsize,
    max_size: usize,
}

impl StringInternCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            map: DashMap::with_hasher(RandomState::new()),
            size: AtomicUsize::new(0),
            max_size,
        }
    }

    /// Return the shared instance equal to `value`, caching it if there is room.
    ///
    /// Empty strings are never cached.
    pub fn get_or_add(&self, value: &str) -> Arc<str> {
        if value.is_empty() {
            return Arc::from(value);
        }

        // Existing keys must be found before the capacity check, otherwise a
        // full cache would stop returning values it already holds.
        if let Some(existing) = self.map.get(value) {
            return Arc::clone(existing.key());
        }
        if self.size.load(Ordering::Acquire) >= self.max_size {
            return Arc::from(value);
        }

        match self.map.entry(Arc::from(value)) {
            Entry::Occupied(occupied) => Arc::clone(occupied.key()),
            Entry::Vacant(vacant) => {
                if self.size.fetch_add(1, Ordering::AcqRel) >= self.max_size {
                    self.size.fetch_sub(1, Ordering::AcqRel);
                    return Arc::clone(vacant.key());
                }
                let key = Arc::clone(vacant.key());
                vacant.insert(());
                key
            }
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.map.contains_key(value)
    }

    pub fn len(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn clear(&self) {
        self.map.clear();
        self.size.store(0, Ordering::Release);
    }
}
