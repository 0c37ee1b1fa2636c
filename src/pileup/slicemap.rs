//! Fixed-width (per column) aggregation
//!
//! [`SliceMapBuilder`] keeps one mutex-guarded, append-only collector per column so reads
//! can be added from many threads. `build` consumes the builder and turns each column
//! into an id-sorted [`Slice`].

use crate::core::{GappedSequence, Nucleotide, Range, SliceError, SliceResult};
use crate::pileup::quality::{GapQualityStrategy, Quality, QualityProvider};
use crate::pileup::read::{add_parallel, drain_reads, AlignedRead, BuildStats, ReadSource};
use crate::pileup::slice::{pack, Slice};
use log::{debug, info};
use parking_lot::Mutex;
use rayon::prelude::*;
use std::sync::Arc;

/// Ordered slices, one per column
#[derive(Debug, Clone, Default)]
pub struct SliceMap {
    slices: Vec<Slice>,
}

impl SliceMap {
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Slice at a gapped column
    pub fn get_slice(&self, offset: usize) -> Option<&Slice> {
        self.slices.get(offset)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slice> {
        self.slices.iter()
    }

    /// Slices over `range`, clamped to the map
    pub fn slices(&self, range: &Range) -> &[Slice] {
        let clamped = range.intersection(&Range::of_length(self.slices.len() as u64));
        if clamped.is_empty() {
            return &[];
        }
        &self.slices[clamped.begin() as usize..=clamped.end() as usize]
    }

    pub fn coverage_depths(&self) -> Vec<usize> {
        self.slices.iter().map(Slice::coverage_depth).collect()
    }

    pub fn max_coverage(&self) -> usize {
        self.slices
            .iter()
            .map(Slice::coverage_depth)
            .max()
            .unwrap_or(0)
    }

    pub fn average_coverage(&self) -> f64 {
        if self.slices.is_empty() {
            return 0.0;
        }
        let total: usize = self.slices.iter().map(Slice::coverage_depth).sum();
        total as f64 / self.slices.len() as f64
    }
}

impl<'a> IntoIterator for &'a SliceMap {
    type Item = &'a Slice;
    type IntoIter = std::slice::Iter<'a, Slice>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.iter()
    }
}

/// Concurrent builder for a [`SliceMap`]
pub struct SliceMapBuilder {
    columns: Vec<Mutex<Vec<(Arc<str>, u16)>>>,
    consensus: Option<Vec<Nucleotide>>,
    strategy: GapQualityStrategy,
    qualities: Option<Arc<dyn QualityProvider>>,
    default_quality: Option<Quality>,
}

impl SliceMapBuilder {
    /// Builder for `len` columns without consensus
    pub fn new(len: usize) -> Self {
        Self {
            columns: (0..len).map(|_| Mutex::new(Vec::new())).collect(),
            consensus: None,
            strategy: GapQualityStrategy::default(),
            qualities: None,
            default_quality: None,
        }
    }

    /// One column per consensus position; each slice carries its consensus symbol
    pub fn from_consensus<S: GappedSequence + ?Sized>(consensus: &S) -> Self {
        let mut builder = Self::new(consensus.len());
        builder.consensus = Some(consensus.to_vec());
        builder
    }

    pub fn gap_quality_strategy(mut self, strategy: GapQualityStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn qualities(mut self, qualities: Arc<dyn QualityProvider>) -> Self {
        self.qualities = Some(qualities);
        self
    }

    /// Quality used for reads the provider does not know
    pub fn default_quality(mut self, quality: Quality) -> Self {
        self.default_quality = Some(quality);
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn resolve_qualities<S: GappedSequence>(
        &self,
        read: &AlignedRead<S>,
    ) -> SliceResult<Vec<Quality>> {
        if let Some(qualities) = self.qualities.as_ref().and_then(|p| p.quality(&read.id)) {
            return self.strategy.gapped_qualities(read, qualities);
        }
        match self.default_quality {
            Some(quality) => {
                let per_column: Vec<Option<Quality>> = (0..read.sequence.len())
                    .map(|i| (!read.sequence.is_gap(i)).then_some(quality))
                    .collect();
                Ok(self.strategy.fill_gaps(&per_column))
            }
            None => Err(SliceError::MissingQualityData(read.id.to_string())),
        }
    }

    /// Append every column of `read`; columns outside the map are dropped
    ///
    /// Returns the number of columns the read contributed to.
    pub fn add_read<S: GappedSequence>(&self, read: &AlignedRead<S>) -> SliceResult<usize> {
        let qualities = self.resolve_qualities(read)?;
        let mut added = 0;
        for (i, quality) in qualities.into_iter().enumerate() {
            let column = read.offset + i as i64;
            if column < 0 || column >= self.columns.len() as i64 {
                continue;
            }
            let base = read.sequence.get(i)?;
            self.columns[column as usize]
                .lock()
                .push((read.id.clone(), pack(base, quality, read.strand)));
            added += 1;
        }
        if added == 0 {
            debug!("Read '{}' lies outside all {} columns", read.id, self.columns.len());
        }
        Ok(added)
    }

    /// Sequentially add every read from `source`, closing it once when done
    pub fn add_reads<R: ReadSource>(&self, source: R) -> SliceResult<BuildStats> {
        let stats = drain_reads(source, |read| self.add_read(read).map(|_| ()))?;
        info!(
            "Added {} of {} reads ({} skipped)",
            stats.added, stats.total, stats.skipped
        );
        Ok(stats)
    }

    /// Add reads on a dedicated rayon pool of `threads` workers
    pub fn add_reads_parallel<S: GappedSequence>(
        &self,
        reads: &[AlignedRead<S>],
        threads: usize,
    ) -> SliceResult<BuildStats> {
        let stats = add_parallel(reads, threads, |read| self.add_read(read).map(|_| ()))?;
        info!(
            "Added {} of {} reads on {} threads ({} skipped)",
            stats.added, stats.total, threads, stats.skipped
        );
        Ok(stats)
    }

    /// Finish aggregation
    pub fn build(self) -> SliceMap {
        let consensus = self.consensus;
        let slices: Vec<Slice> = self
            .columns
            .into_par_iter()
            .enumerate()
            .map(|(i, column)| {
                let symbol = consensus.as_ref().and_then(|c| c.get(i).copied());
                Slice::from_packed(column.into_inner(), symbol)
            })
            .collect();
        SliceMap { slices }
    }
}
