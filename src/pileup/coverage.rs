//! Interval index of read spans
//!
//! Uses rust-lapper for efficient overlap queries. Columns may be negative (reads
//! hanging off the reference start), so every span is shifted onto an unsigned axis
//! starting at `origin`.

use crate::core::{GappedSequence, Range};
use crate::pileup::read::AlignedRead;
use rust_lapper::{Interval, Lapper};
use std::sync::Arc;

/// Lapper interval: half-open `[start, stop)` on the shifted axis, value = read id
pub type ReadInterval = Interval<u64, Arc<str>>;

/// Depth and overlap queries over read spans
#[derive(Debug)]
pub struct CoverageMap {
    lapper: Lapper<u64, Arc<str>>,
    origin: i64,
}

impl CoverageMap {
    /// Index `(id, gapped span)` pairs; empty spans are ignored
    pub fn new(spans: Vec<(Arc<str>, Range)>) -> Self {
        let origin = spans
            .iter()
            .filter(|(_, r)| !r.is_empty())
            .map(|(_, r)| r.begin())
            .min()
            .unwrap_or(0)
            .min(0);
        let intervals: Vec<ReadInterval> = spans
            .into_iter()
            .filter(|(_, r)| !r.is_empty())
            .map(|(id, r)| Interval {
                start: (r.begin() - origin) as u64,
                stop: (r.end() - origin + 1) as u64,
                val: id,
            })
            .collect();
        Self {
            lapper: Lapper::new(intervals),
            origin,
        }
    }

    /// Index the gapped span of every read
    pub fn from_reads<S: GappedSequence>(reads: &[AlignedRead<S>]) -> Self {
        Self::new(
            reads
                .iter()
                .map(|r| (r.id.clone(), r.gapped_range()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.lapper.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lapper.is_empty()
    }

    fn to_axis(&self, position: i64) -> Option<u64> {
        (position >= self.origin).then(|| (position - self.origin) as u64)
    }

    /// Reads covering `position`
    pub fn depth_at(&self, position: i64) -> usize {
        match self.to_axis(position) {
            Some(p) => self.lapper.count(p, p + 1),
            None => 0,
        }
    }

    /// Ids of reads overlapping `range`
    pub fn reads_overlapping(&self, range: &Range) -> Vec<Arc<str>> {
        if range.is_empty() || range.end() < self.origin {
            return Vec::new();
        }
        let start = range.begin().max(self.origin) - self.origin;
        let stop = range.end() - self.origin + 1;
        let mut ids: Vec<Arc<str>> = self
            .lapper
            .find(start as u64, stop as u64)
            .map(|iv| iv.val.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Maximal runs of constant positive depth, as `(range, depth)`
    pub fn coverage_regions(&self) -> Vec<(Range, usize)> {
        self.lapper
            .depth()
            .filter(|iv| iv.val > 0 && iv.stop > iv.start)
            .map(|iv| {
                let begin = iv.start as i64 + self.origin;
                let end = iv.stop as i64 + self.origin - 1;
                (Range::of_length((end - begin + 1) as u64).shift(begin), iv.val as usize)
            })
            .collect()
    }

    pub fn max_depth(&self) -> usize {
        self.coverage_regions()
            .into_iter()
            .map(|(_, depth)| depth)
            .max()
            .unwrap_or(0)
    }
}
