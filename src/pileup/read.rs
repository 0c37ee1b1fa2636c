//! Aligned reads and the sources that supply them
//!
//! A [`ReadSource`] must be released exactly once. [`ReadStream`] wraps a source and
//! guarantees that: `close()` is idempotent and dropping an unclosed stream closes it.
//! [`consume`] gives the open / use / close sequence as one call.

use crate::core::{GappedSequence, NucleotideSequence, Range, SliceError, SliceResult, Strand};
use log::{debug, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Reads handed to one worker at a time
const CHUNK_SIZE: usize = 1024;

/// A read placed on the reference's gapped axis
#[derive(Debug, Clone)]
pub struct AlignedRead<S = NucleotideSequence> {
    pub id: Arc<str>,
    /// Gapped reference column of the read's first column
    pub offset: i64,
    pub strand: Strand,
    pub sequence: S,
    /// Trimmed region of the full-length read, in ungapped read coordinates
    pub valid_range: Range,
}

impl<S: GappedSequence> AlignedRead<S> {
    /// Valid range defaults to the whole ungapped read
    pub fn new(id: impl Into<Arc<str>>, offset: i64, strand: Strand, sequence: S) -> Self {
        let valid_range = Range::of_length(sequence.ungapped_len() as u64);
        Self {
            id: id.into(),
            offset,
            strand,
            sequence,
            valid_range,
        }
    }

    pub fn with_valid_range(mut self, valid_range: Range) -> Self {
        self.valid_range = valid_range;
        self
    }

    /// Columns covered on the reference's gapped axis
    pub fn gapped_range(&self) -> Range {
        Range::of_length(self.sequence.len() as u64).shift(self.offset)
    }
}

/// Supplier of aligned reads
pub trait ReadSource {
    type Sequence: GappedSequence;

    /// Next read, an error for a malformed record, or `None` when exhausted
    fn next_read(&mut self) -> Option<SliceResult<AlignedRead<Self::Sequence>>>;

    /// Release the source's resources
    fn close(&mut self) -> SliceResult<()>;
}

/// Iterator over a [`ReadSource`] that closes it exactly once
pub struct ReadStream<R: ReadSource> {
    source: R,
    closed: bool,
}

impl<R: ReadSource> ReadStream<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            closed: false,
        }
    }

    /// Close the source; later calls are no-ops
    pub fn close(&mut self) -> SliceResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.source.close()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<R: ReadSource> Iterator for ReadStream<R> {
    type Item = SliceResult<AlignedRead<R::Sequence>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.source.next_read()
    }
}

impl<R: ReadSource> Drop for ReadStream<R> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close read source: {}", e);
        }
    }
}

/// Run `f` over a stream of `source`, then close the source
///
/// The source is closed exactly once whether `f` succeeds or fails. When both fail,
/// the error from `f` is returned and the close error is logged.
pub fn consume<R, F, T>(source: R, f: F) -> SliceResult<T>
where
    R: ReadSource,
    F: FnOnce(&mut ReadStream<R>) -> SliceResult<T>,
{
    let mut stream = ReadStream::new(source);
    let result = f(&mut stream);
    let closed = stream.close();
    match result {
        Ok(value) => closed.map(|_| value),
        Err(e) => {
            if let Err(close_error) = closed {
                warn!("Failed to close read source after error: {}", close_error);
            }
            Err(e)
        }
    }
}

/// In-memory read source
pub struct VecReadSource<S = NucleotideSequence> {
    reads: std::vec::IntoIter<SliceResult<AlignedRead<S>>>,
}

impl<S> VecReadSource<S> {
    pub fn new(reads: Vec<AlignedRead<S>>) -> Self {
        Self {
            reads: reads.into_iter().map(Ok).collect::<Vec<_>>().into_iter(),
        }
    }

    /// Source that may also yield malformed records
    pub fn from_results(reads: Vec<SliceResult<AlignedRead<S>>>) -> Self {
        Self {
            reads: reads.into_iter(),
        }
    }
}

impl<S: GappedSequence> ReadSource for VecReadSource<S> {
    type Sequence = S;

    fn next_read(&mut self) -> Option<SliceResult<AlignedRead<S>>> {
        self.reads.next()
    }

    fn close(&mut self) -> SliceResult<()> {
        Ok(())
    }
}

/// Read counts from a build pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub total: usize,
    pub added: usize,
    pub skipped: usize,
}

/// Feed every read of `source` to `add`, skipping malformed reads
pub(crate) fn drain_reads<R, F>(source: R, mut add: F) -> SliceResult<BuildStats>
where
    R: ReadSource,
    F: FnMut(&AlignedRead<R::Sequence>) -> SliceResult<()>,
{
    consume(source, |stream| {
        let mut stats = BuildStats::default();
        for item in stream {
            stats.total += 1;
            let outcome = item.and_then(|read| {
                add(&read).map_err(|e| {
                    debug!("Read '{}' rejected", read.id);
                    e
                })
            });
            match outcome {
                Ok(()) => stats.added += 1,
                Err(e @ SliceError::ReadSource(_)) => return Err(e),
                Err(e) => {
                    warn!("Skipping malformed read: {}", e);
                    stats.skipped += 1;
                }
            }
        }
        Ok(stats)
    })
}

/// Feed `reads` to `add` on a dedicated rayon pool of `threads` workers
///
/// Failed reads are logged and counted as skipped.
pub(crate) fn add_parallel<S, F>(
    reads: &[AlignedRead<S>],
    threads: usize,
    add: F,
) -> SliceResult<BuildStats>
where
    S: GappedSequence,
    F: Fn(&AlignedRead<S>) -> SliceResult<()> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| SliceError::ThreadPool(e.to_string()))?;

    let added = AtomicUsize::new(0);
    let skipped = AtomicUsize::new(0);

    pool.install(|| {
        reads.par_chunks(CHUNK_SIZE).for_each(|chunk| {
            for read in chunk {
                match add(read) {
                    Ok(()) => {
                        added.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        warn!("Skipping read '{}': {}", read.id, e);
                        skipped.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        })
    });

    Ok(BuildStats {
        total: reads.len(),
        added: added.load(Ordering::Relaxed),
        skipped: skipped.load(Ordering::Relaxed),
    })
}
