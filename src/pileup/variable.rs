//! Variable-width (window) aggregation
//!
//! The reference's ungapped bases are cut into windows of `width` bases. A window's
//! gapped span starts at its first base and runs up to the column before the next
//! window's first base, so reference-gap columns after a window's last base belong to
//! that window. Window boundaries come from the reference alone.
//!
//! A read contributes to a window only when it covers the window's first and last base.
//! Its candidate sequence is the read's symbol at each of the window's `width` reference
//! bases, deletions included as gaps. Reference-gap columns carry no window position and
//! are left out. Candidates made only of gaps are not counted.

use crate::core::{GappedSequence, Nucleotide, Range, SliceError, SliceResult};
use crate::pileup::read::{add_parallel, drain_reads, AlignedRead, BuildStats, ReadSource};
use log::{debug, info};
use parking_lot::RwLock;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Window boundaries on the reference's gapped axis
#[derive(Debug, Clone)]
pub(crate) struct WindowLayout {
    range: Range,
    width: usize,
    /// Ungapped reference coordinate of the first base in `range`
    ungapped_origin: usize,
    /// Gapped column of every reference base in `range`, `width` per window
    bases: Vec<usize>,
    starts: Vec<usize>,
    last_bases: Vec<usize>,
    ends: Vec<usize>,
    references: Vec<Vec<Nucleotide>>,
}

impl WindowLayout {
    pub(crate) fn new<S: GappedSequence + ?Sized>(
        reference: &S,
        width: usize,
        range: Option<Range>,
    ) -> SliceResult<Self> {
        let whole = Range::of_length(reference.len() as u64);
        let range = range.map(|r| r.intersection(&whole)).unwrap_or(whole);

        let columns: Vec<usize> = range
            .positions()
            .map(|c| c as usize)
            .filter(|&c| !reference.is_gap(c))
            .collect();
        if width == 0 || columns.len() % width != 0 {
            return Err(SliceError::UnalignedWidth {
                ungapped_length: columns.len(),
                width,
            });
        }

        let ungapped_origin = match columns.first() {
            Some(&first) => reference.gapped_to_ungapped(first)?,
            None => 0,
        };

        let mut starts = Vec::with_capacity(columns.len() / width);
        let mut last_bases = Vec::with_capacity(columns.len() / width);
        let mut references = Vec::with_capacity(columns.len() / width);
        for window in columns.chunks(width) {
            starts.push(window[0]);
            last_bases.push(window[width - 1]);
            references.push(
                window
                    .iter()
                    .map(|&c| reference.get(c))
                    .collect::<Result<Vec<_>, _>>()?,
            );
        }
        let mut ends: Vec<usize> = starts.iter().skip(1).map(|s| s - 1).collect();
        if !starts.is_empty() {
            ends.push(range.end() as usize);
        }

        Ok(Self {
            range,
            width,
            ungapped_origin,
            bases: columns,
            starts,
            last_bases,
            ends,
            references,
        })
    }

    fn len(&self) -> usize {
        self.starts.len()
    }

    fn window_bases(&self, window: usize) -> &[usize] {
        &self.bases[window * self.width..(window + 1) * self.width]
    }

    fn gapped_range(&self, window: usize) -> Range {
        Range::new(self.starts[window] as i64, self.ends[window] as i64)
            .unwrap_or_else(|_| Range::empty_at(self.starts[window] as i64))
    }
}

/// Concurrent tally of window sequences
struct WindowCounter {
    counts: RwLock<HashMap<Vec<Nucleotide>, AtomicU64>>,
}

impl WindowCounter {
    fn seeded(reference: &[Nucleotide]) -> Self {
        let mut counts = HashMap::new();
        counts.insert(reference.to_vec(), AtomicU64::new(0));
        Self {
            counts: RwLock::new(counts),
        }
    }

    fn increment(&self, candidate: Vec<Nucleotide>) {
        {
            let counts = self.counts.read();
            if let Some(count) = counts.get(&candidate) {
                count.fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        self.counts
            .write()
            .entry(candidate)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    fn into_counts(self) -> Vec<VariableWidthSliceElement> {
        let mut elements: Vec<VariableWidthSliceElement> = self
            .counts
            .into_inner()
            .into_iter()
            .map(|(sequence, count)| VariableWidthSliceElement {
                sequence,
                count: count.into_inner(),
            })
            .filter(|e| e.count > 0)
            .collect();
        elements.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.sequence.cmp(&b.sequence))
        });
        elements
    }
}

/// One distinct sequence observed in a window and how often
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableWidthSliceElement {
    pub sequence: Vec<Nucleotide>,
    pub count: u64,
}

/// Tallies for one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableWidthSlice {
    reference: Vec<Nucleotide>,
    gapped_range: Range,
    elements: Vec<VariableWidthSliceElement>,
}

impl VariableWidthSlice {
    /// Observed sequences, most frequent first
    pub fn elements(&self) -> &[VariableWidthSliceElement] {
        &self.elements
    }

    pub fn get_count_for(&self, sequence: &[Nucleotide]) -> u64 {
        self.elements
            .iter()
            .find(|e| e.sequence == sequence)
            .map_or(0, |e| e.count)
    }

    /// Reads that contributed to the window
    pub fn coverage_depth(&self) -> u64 {
        self.elements.iter().map(|e| e.count).sum()
    }

    pub fn most_frequent(&self) -> Option<&VariableWidthSliceElement> {
        self.elements.first()
    }

    /// The reference's own ungapped window sequence
    pub fn reference_sequence(&self) -> &[Nucleotide] {
        &self.reference
    }

    /// Columns spanned on the reference's gapped axis
    pub fn gapped_range(&self) -> Range {
        self.gapped_range
    }
}

/// Ordered windows over a reference region
#[derive(Debug, Clone)]
pub struct VariableWidthSliceMap {
    slices: Vec<VariableWidthSlice>,
    width: usize,
    ungapped_origin: usize,
    range: Range,
}

impl VariableWidthSliceMap {
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Gapped reference region covered by the map
    pub fn range(&self) -> Range {
        self.range
    }

    pub fn get_slice(&self, index: usize) -> Option<&VariableWidthSlice> {
        self.slices.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VariableWidthSlice> {
        self.slices.iter()
    }

    /// Windows whose gapped span intersects `range`
    pub fn slices_intersecting_gapped(&self, range: &Range) -> &[VariableWidthSlice] {
        if range.is_empty() {
            return &[];
        }
        let first = self
            .slices
            .partition_point(|s| s.gapped_range.end() < range.begin());
        let last = self
            .slices
            .partition_point(|s| s.gapped_range.begin() <= range.end());
        if first >= last {
            return &[];
        }
        &self.slices[first..last]
    }

    /// Windows holding any base of `range`, given in the reference's ungapped coordinates
    pub fn slices_intersecting_ungapped(&self, range: &Range) -> &[VariableWidthSlice] {
        let origin = self.ungapped_origin as i64;
        let covered = Range::of_length((self.slices.len() * self.width) as u64).shift(origin);
        let clamped = range.intersection(&covered);
        if clamped.is_empty() {
            return &[];
        }
        let first = ((clamped.begin() - origin) as usize) / self.width;
        let last = ((clamped.end() - origin) as usize) / self.width;
        &self.slices[first..=last]
    }
}

/// Concurrent builder for a [`VariableWidthSliceMap`]
pub struct VariableWidthSliceMapBuilder {
    layout: WindowLayout,
    counters: Vec<WindowCounter>,
}

impl VariableWidthSliceMapBuilder {
    /// Windows over the whole reference
    pub fn new<S: GappedSequence + ?Sized>(reference: &S, width: usize) -> SliceResult<Self> {
        Self::with_optional_range(reference, width, None)
    }

    /// Windows over `gapped_range`, clamped to the reference
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::{NucleotideSequence, Range};
    /// use fast_slicemap::pileup::VariableWidthSliceMapBuilder;
    ///
    /// let reference: NucleotideSequence = "AACCGGTT".parse().unwrap();
    /// let range = Range::new(2, 5).unwrap();
    /// let builder = VariableWidthSliceMapBuilder::with_range(&reference, 2, range).unwrap();
    /// assert_eq!(builder.build().len(), 2);
    /// ```
    pub fn with_range<S: GappedSequence + ?Sized>(
        reference: &S,
        width: usize,
        gapped_range: Range,
    ) -> SliceResult<Self> {
        Self::with_optional_range(reference, width, Some(gapped_range))
    }

    pub(crate) fn with_optional_range<S: GappedSequence + ?Sized>(
        reference: &S,
        width: usize,
        gapped_range: Option<Range>,
    ) -> SliceResult<Self> {
        let layout = WindowLayout::new(reference, width, gapped_range)?;
        let counters = layout
            .references
            .iter()
            .map(|r| WindowCounter::seeded(r))
            .collect();
        Ok(Self { layout, counters })
    }

    pub fn num_windows(&self) -> usize {
        self.layout.len()
    }

    /// Count `read` placed at gapped reference column `offset`
    ///
    /// Returns the number of windows the read was counted in.
    pub fn add<S: GappedSequence + ?Sized>(&self, offset: i64, read: &S) -> SliceResult<usize> {
        let first_base = (0..read.len()).find(|&i| !read.is_gap(i));
        let last_base = (0..read.len()).rev().find(|&i| !read.is_gap(i));
        let (Some(first_base), Some(last_base)) = (first_base, last_base) else {
            debug!("Read at {} has no bases", offset);
            return Ok(0);
        };

        let trimmed = Range::new(offset + first_base as i64, offset + last_base as i64)?;
        let overlap = trimmed.intersection(&self.layout.range);
        if overlap.is_empty() {
            debug!("Read {} does not overlap {}", trimmed, self.layout.range);
            return Ok(0);
        }

        let first_window = self
            .layout
            .starts
            .partition_point(|&s| (s as i64) < overlap.begin());

        let mut counted = 0;
        for window in first_window..self.layout.len() {
            if self.layout.last_bases[window] as i64 > overlap.end() {
                break;
            }
            let candidate = self
                .layout
                .window_bases(window)
                .iter()
                .map(|&column| read.get((column as i64 - offset) as usize))
                .collect::<Result<Vec<_>, _>>()?;
            if candidate.iter().all(|n| n.is_gap()) {
                debug!("Read at {} has only gaps in window {}", offset, window);
                continue;
            }
            self.counters[window].increment(candidate);
            counted += 1;
        }
        Ok(counted)
    }

    pub fn add_read<S: GappedSequence>(&self, read: &AlignedRead<S>) -> SliceResult<usize> {
        self.add(read.offset, &read.sequence)
    }

    /// Sequentially add every read from `source`, closing it once when done
    pub fn add_reads<R: ReadSource>(&self, source: R) -> SliceResult<BuildStats> {
        let stats = drain_reads(source, |read| self.add_read(read).map(|_| ()))?;
        info!(
            "Counted {} of {} reads into {} windows ({} skipped)",
            stats.added,
            stats.total,
            self.num_windows(),
            stats.skipped
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
            "Counted {} of {} reads into {} windows on {} threads ({} skipped)",
            stats.added,
            stats.total,
            self.num_windows(),
            threads,
            stats.skipped
        );
        Ok(stats)
    }

    pub fn build(self) -> VariableWidthSliceMap {
        let layout = self.layout;
        let slices = self
            .counters
            .into_par_iter()
            .enumerate()
            .map(|(window, counter)| VariableWidthSlice {
                reference: layout.references[window].clone(),
                gapped_range: layout.gapped_range(window),
                elements: counter.into_counts(),
            })
            .collect();
        VariableWidthSliceMap {
            slices,
            width: layout.width,
            ungapped_origin: layout.ungapped_origin,
            range: layout.range,
        }
    }
}
