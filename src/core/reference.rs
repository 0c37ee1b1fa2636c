//! Reference-relative sequence encoding
//!
//! Stores a read as its differences from a shared reference. Only gaps, mismatching
//! symbols and the parts hanging off either end of the reference are kept; everything
//! else is read through from the reference at `local + start_offset`.

use crate::core::dna::Nucleotide;
use crate::core::error::{SequenceError, SequenceResult};
use crate::core::range::Range;
use crate::core::sequence::{GappedSequence, NucleotideSequence};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A gapped sequence encoded against a reference
#[derive(Debug, Clone)]
pub struct ReferenceEncodedSequence {
    reference: Arc<NucleotideSequence>,
    start_offset: i64,
    len: usize,
    valid_range: Range,
    gaps: Vec<usize>,
    differences: BTreeMap<usize, Nucleotide>,
    /// Symbols at local `[0, before.len())`, left of the reference
    before: Vec<Nucleotide>,
    /// Symbols at local `[after_start, len)`, right of the reference
    after: Vec<Nucleotide>,
    after_start: usize,
}

impl ReferenceEncodedSequence {
    /// Encode `symbols` placed at `start_offset` on the reference in a single pass
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::{
    ///     GappedSequence, Nucleotide, NucleotideSequence, ReferenceEncodedSequence,
    /// };
    /// use fast_slicemap::core::dna::parse_nucleotides;
    /// use std::sync::Arc;
    ///
    /// let reference: Arc<NucleotideSequence> = Arc::new("ACGT".parse().unwrap());
    /// let read = parse_nucleotides("ACTT").unwrap();
    /// let encoded = ReferenceEncodedSequence::new(reference, &read, 0);
    /// assert_eq!(encoded.num_differences(), 1);
    /// assert_eq!(encoded.get(2).unwrap(), Nucleotide::Thymine);
    /// ```
    pub fn new(
        reference: Arc<NucleotideSequence>,
        symbols: &[Nucleotide],
        start_offset: i64,
    ) -> Self {
        let len = symbols.len();
        let reference_len = reference.len() as i64;
        let before_len = (-start_offset).clamp(0, len as i64) as usize;
        let after_start =
            (reference_len - start_offset).clamp(before_len as i64, len as i64) as usize;

        let mut gaps = Vec::new();
        let mut differences = BTreeMap::new();
        for (local, &symbol) in symbols.iter().enumerate() {
            if symbol.is_gap() {
                gaps.push(local);
                continue;
            }
            if local < before_len || local >= after_start {
                continue;
            }
            let reference_index = (local as i64 + start_offset) as usize;
            if reference.symbol(reference_index) != Some(symbol) {
                differences.insert(local, symbol);
            }
        }

        Self {
            reference,
            start_offset,
            len,
            valid_range: Range::of_length(len as u64),
            gaps,
            differences,
            before: symbols[..before_len].to_vec(),
            after: symbols[after_start..].to_vec(),
            after_start,
        }
    }

    /// Replace the valid (trimmed) range, expressed in local ungapped coordinates
    pub fn with_valid_range(mut self, valid_range: Range) -> Self {
        self.valid_range = valid_range;
        self
    }

    pub fn valid_range(&self) -> Range {
        self.valid_range
    }

    pub fn start_offset(&self) -> i64 {
        self.start_offset
    }

    pub fn reference(&self) -> &Arc<NucleotideSequence> {
        &self.reference
    }

    /// Local index → symbol for every position differing from the reference
    pub fn differences(&self) -> &BTreeMap<usize, Nucleotide> {
        &self.differences
    }

    pub fn num_differences(&self) -> usize {
        self.differences.len()
    }

    /// Span on the reference's gapped axis
    pub fn gapped_range(&self) -> Range {
        Range::of_length(self.len as u64).shift(self.start_offset)
    }

    /// Materialise as a standalone sequence
    pub fn to_nucleotide_sequence(&self) -> SequenceResult<NucleotideSequence> {
        NucleotideSequence::new(&self.to_vec())
    }

    fn lookup(&self, index: usize) -> Option<Nucleotide> {
        if index >= self.len {
            return None;
        }
        if self.gaps.binary_search(&index).is_ok() {
            return Some(Nucleotide::Gap);
        }
        if index < self.before.len() {
            return Some(self.before[index]);
        }
        if index >= self.after_start {
            return Some(self.after[index - self.after_start]);
        }
        if let Some(&symbol) = self.differences.get(&index) {
            return Some(symbol);
        }
        self.reference
            .symbol((index as i64 + self.start_offset) as usize)
    }
}

impl GappedSequence for ReferenceEncodedSequence {
    fn len(&self) -> usize {
        self.len
    }

    fn symbol(&self, index: usize) -> Option<Nucleotide> {
        self.lookup(index)
    }

    fn gap_offsets(&self) -> &[usize] {
        &self.gaps
    }

    fn get(&self, index: usize) -> SequenceResult<Nucleotide> {
        self.lookup(index).ok_or(SequenceError::IndexOutOfBounds {
            index,
            len: self.len,
        })
    }
}
