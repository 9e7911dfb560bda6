//! Bounded object pool for reusing scratch buffers during bulk indexing.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;
type Reset<T> = Box<dyn Fn(&mut T) + Send + Sync>;

/// A pool that hands out reusable instances and keeps at most `max_size` idle ones.
///
/// The idle bound is checked without holding the lock across the whole
/// return path, so under contention the pool can briefly hold one or two items
/// more or fewer than `max_size`.
pub struct ObjectPool<T> {
    items: Mutex<Vec<T>>,
    factory: Factory<T>,
    reset: Option<Reset<T>>,
    max_size: usize,
    total_created: AtomicUsize,
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("count", &self.count())
            .field("max_size", &self.max_size)
            .field("total_created", &self.total_created())
            .finish_non_exhaustive()
    }
}

impl<T> ObjectPool<T> {
    pub fn new(max_size: usize, factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            items: Mutex::new(Vec::with_capacity(max_size)),
            factory: Box::new(factory),
            reset: None,
            max_size,
            total_created: AtomicUsize::new(0),
        }
    }

    /// Run `reset` on every item as it comes back to the pool.
    pub fn with_reset(mut self, reset: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.reset = Some(Box::new(reset));
        self
    }

    /// Take an idle item, or build a new one.
    pub fn rent(&self) -> T {
        if let Some(item) = self.items.lock().pop() {
            return item;
        }
        self.total_created.fetch_add(1, Ordering::Relaxed);
        (self.factory)()
    }

    /// Hand an item back. Items beyond the idle bound are dropped.
    pub fn give_back(&self, mut item: T) {
        if let Some(reset) = &self.reset {
            reset(&mut item);
        }

        if self.count() < self.max_size {
            self.items.lock().push(item);
        } else {
            self.total_created.fetch_sub(1, Ordering::Relaxed);
            tracing::trace!("Pool at capacity ({}), discarding item", self.max_size);
        }
    }

    /// Rent an item that goes back to the pool when the guard drops.
    pub fn rent_scoped(&self) -> Pooled<'_, T> {
        Pooled {
            pool: self,
            item: Some(self.rent()),
        }
    }

    /// Number of idle items.
    pub fn count(&self) -> usize {
        self.items.lock().len()
    }

    /// Items alive that this pool is accounting for (idle + rented).
    pub fn total_created(&self) -> usize {
        self.total_created.load(Ordering::Relaxed)
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

/// RAII guard returned by [`ObjectPool::rent_scoped`].
pub struct Pooled<'a, T> {
    pool: &'a ObjectPool<T>,
    item: Option<T>,
}

impl<T> std::ops::Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.item.as_ref().expect("pooled item present until drop")
    }
}

impl<T> std::ops::DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.item.as_mut().expect("pooled item present until drop")
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.give_back(item);
        }
    }
}
