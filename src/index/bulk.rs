//! Bulk loading of records into an index.

use super::DocumentSink;
use crate::document::{self, FieldSet};
use crate::error::Result;
use crate::model::MemberInfo;
use crate::perf::{ObjectPool, StringInternCache};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Writes records through a [`DocumentSink`], reusing field buffers and sharing
/// repeated values so large batches don't allocate per document.
pub struct BulkIndexer<'a> {
    sink: &'a dyn DocumentSink,
    buffers: ObjectPool<FieldSet>,
    interner: StringInternCache,
}

impl<'a> BulkIndexer<'a> {
    pub fn new(sink: &'a dyn DocumentSink, pool_max_size: usize, intern_max_size: usize) -> Self {
        Self {
            sink,
            buffers: ObjectPool::new(pool_max_size, || FieldSet::with_capacity(32))
                .with_reset(FieldSet::clear),
            interner: StringInternCache::new(intern_max_size),
        }
    }

    /// Add one record without committing.
    pub fn add(&self, member: &MemberInfo) -> Result<()> {
        let mut buffer = self.buffers.rent_scoped();
        document::write_fields(member, &mut buffer, Some(&self.interner));
        self.sink.add_document(&buffer)
    }

    /// Add every record and commit once at the end. Returns the number written.
    pub fn index_all<'m>(&self, members: impl IntoIterator<Item = &'m MemberInfo>) -> Result<usize> {
        let mut count = 0;
        let outcome = members.into_iter().try_for_each(|member| -> Result<()> {
            self.add(member)?;
            count += 1;
            Ok(())
        });
        self.settle(outcome)?;
        tracing::info!("Indexed {} documentation records", count);
        Ok(count)
    }

    /// Like [`index_all`](Self::index_all) but spreads the work over `workers` threads.
    pub fn index_parallel(&self, members: &[MemberInfo], workers: usize) -> Result<usize> {
        let workers = workers.max(1);
        let chunk_size = members.len().div_ceil(workers).max(1);
        let written = AtomicUsize::new(0);

        let outcome = std::thread::scope(|scope| {
            let handles: Vec<_> = members
                .chunks(chunk_size)
                .map(|chunk| {
                    let written = &written;
                    scope.spawn(move || -> Result<()> {
                        for member in chunk {
                            self.add(member)?;
                            written.fetch_add(1, Ordering::Relaxed);
                        }
                        Ok(())
                    })
                })
                .collect();

            handles.into_iter().try_for_each(|handle| {
                handle
                    .join()
                    .map_err(|_| anyhow::anyhow!("Indexing worker panicked"))?
            })
        });

        self.settle(outcome)?;
        let count = written.into_inner();
        tracing::info!(
            "Indexed {} documentation records on {} workers ({} distinct shared strings)",
            count,
            workers,
            self.interner.len()
        );
        Ok(count)
    }

    /// Commit a finished batch, or discard its pending documents if it failed.
    fn settle(&self, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => self.sink.commit(),
            Err(err) => {
                tracing::warn!("Indexing failed, discarding uncommitted documents: {:#}", err);
                if let Err(rollback_err) = self.sink.rollback() {
                    tracing::error!("Rollback failed: {:#}", rollback_err);
                }
                Err(err)
            }
        }
    }

    pub fn interner(&self) -> &StringInternCache {
        &self.interner
    }

    pub fn buffers(&self) -> &ObjectPool<FieldSet> {
        &self.buffers
    }
}
