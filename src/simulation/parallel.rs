//! Static parallel-for over contiguous index ranges
//!
//! The acceleration phase of every kernel is expressed as "for each chunk of
//! the output buffer, fill it". How the chunks are scheduled is the job of
//! a [`ParallelFor`] executor:
//!
//! - [`SerialExecutor`]: one chunk, calling thread
//! - [`WorkerExecutor`]: one scoped OS thread per chunk, joined at scope exit
//! - [`PoolExecutor`]: one rayon task per chunk on a fixed-size pool,
//!   joined when `install` returns
//!
//! Every executor hands each worker a disjoint `&mut` slice produced by
//! `split_at_mut`, so exclusive write ownership of an index range is
//! enforced by the borrow checker instead of by locks.

use std::ops::Range;
use std::thread;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::error::{NbodyError, Result};

/// Split `[0, n)` into `threads` contiguous chunks.
///
/// Chunk size is `n / threads`; the last chunk absorbs the remainder and
/// always ends at `n`. When `threads > n` the leading chunks are empty.
pub fn static_chunks(n: usize, threads: usize) -> Result<Vec<Range<usize>>> {
    if threads == 0 {
        return Err(NbodyError::InvalidThreadCount(threads));
    }
    Ok(chunk_ranges(n, threads))
}

// threads > 0
fn chunk_ranges(n: usize, threads: usize) -> Vec<Range<usize>> {
    let chunk = n / threads;
    (0..threads)
        .map(|t| {
            let start = t * chunk;
            let end = if t == threads - 1 { n } else { start + chunk };
            start..end
        })
        .collect()
}

/// Carve `out` into the sub-slices named by `ranges` (which must be
/// contiguous and cover `out` in order), tagged with their start index
fn split_by_ranges<'a, T>(mut out: &'a mut [T], ranges: &[Range<usize>]) -> Vec<(usize, &'a mut [T])> {
    let mut parts = Vec::with_capacity(ranges.len());
    for r in ranges {
        let (head, tail) = std::mem::take(&mut out).split_at_mut(r.len());
        parts.push((r.start, head));
        out = tail;
    }
    parts
}

/// Execution backend for a statically partitioned parallel-for
pub trait ParallelFor: Send + Sync {
    /// Short backend name for logs and reports
    fn name(&self) -> &'static str;

    /// Number of chunks / workers per invocation
    fn workers(&self) -> usize;

    /// Call `f(start, chunk)` once per chunk of `out`, where `chunk` covers
    /// `out[start..start + chunk.len()]`. Returns only after every call
    /// has completed.
    fn for_each_chunk<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SerialExecutor;

impl ParallelFor for SerialExecutor {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn workers(&self) -> usize {
        1
    }

    fn for_each_chunk<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        f(0, out);
    }
}

/// Manually spawned workers, one per chunk
#[derive(Debug, Clone, Copy)]
pub struct WorkerExecutor {
    threads: usize,
}

impl WorkerExecutor {
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(NbodyError::InvalidThreadCount(threads));
        }
        Ok(Self { threads })
    }
}

impl ParallelFor for WorkerExecutor {
    fn name(&self) -> &'static str {
        "threads"
    }

    fn workers(&self) -> usize {
        self.threads
    }

    fn for_each_chunk<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        let ranges = chunk_ranges(out.len(), self.threads);
        let parts = split_by_ranges(out, &ranges);
        let f = &f;

        // leaving the scope joins every worker
        thread::scope(|s| {
            for (start, chunk) in parts {
                s.spawn(move || f(start, chunk));
            }
        });
    }
}

/// rayon pool with a fixed worker count; each static chunk is one task
pub struct PoolExecutor {
    pool: ThreadPool,
    threads: usize,
}

impl PoolExecutor {
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(NbodyError::InvalidThreadCount(threads));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("nbsim-pool-{i}"))
            .build()?;
        Ok(Self { pool, threads })
    }
}

impl std::fmt::Debug for PoolExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolExecutor").field("threads", &self.threads).finish()
    }
}

impl ParallelFor for PoolExecutor {
    fn name(&self) -> &'static str {
        "pool"
    }

    fn workers(&self) -> usize {
        self.threads
    }

    fn for_each_chunk<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        let ranges = chunk_ranges(out.len(), self.threads);
        let parts = split_by_ranges(out, &ranges);
        let f = &f;

        // chunks are fixed up front; with_max_len(1) stops rayon from
        // splitting the chunk list further
        self.pool.install(|| {
            parts
                .into_par_iter()
                .with_max_len(1)
                .for_each(|(start, chunk)| f(start, chunk));
        });
    }
}
