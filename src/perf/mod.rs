//! Allocation-reduction helpers shared by indexing workers.

mod intern;
mod pool;

pub use intern::StringInternCache;
pub use pool::{ObjectPool, Pooled};
