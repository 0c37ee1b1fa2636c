//! RNA edits
//!
//! An [`RnaEdit`] replaces a region of the reference (in ungapped coordinates) with a
//! new sequence that may be longer or shorter. Applying it yields an [`AppliedRnaEdit`]
//! that can carry reads over to the edited coordinate frame.

use crate::core::{
    GappedSequence, Nucleotide, NucleotideSequence, Range, SliceError, SliceResult,
};
use log::debug;
use std::sync::Arc;

/// Declared replacement of a reference region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RnaEdit {
    region: Range,
    original: Vec<Nucleotide>,
    replacement: Vec<Nucleotide>,
}

impl RnaEdit {
    /// `region` is in ungapped reference coordinates and must be as long as `original`
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::{dna::parse_nucleotides, Range};
    /// use fast_slicemap::pileup::RnaEdit;
    ///
    /// let edit = RnaEdit::new(
    ///     Range::new(2, 4).unwrap(),
    ///     parse_nucleotides("CGT").unwrap(),
    ///     parse_nucleotides("CAGT").unwrap(),
    /// )
    /// .unwrap();
    /// assert_eq!(edit.bases_added(), 1);
    /// ```
    pub fn new(
        region: Range,
        original: Vec<Nucleotide>,
        replacement: Vec<Nucleotide>,
    ) -> SliceResult<Self> {
        if region.is_empty() || region.begin() < 0 {
            return Err(SliceError::InvalidEdit(format!(
                "region {} is empty or negative",
                region
            )));
        }
        if region.len() != original.len() as u64 {
            return Err(SliceError::InvalidEdit(format!(
                "region {} spans {} bases but original has {}",
                region,
                region.len(),
                original.len()
            )));
        }
        if original.iter().chain(&replacement).any(|n| n.is_gap()) {
            return Err(SliceError::InvalidEdit(
                "original and replacement must not contain gaps".to_string(),
            ));
        }
        Ok(Self {
            region,
            original,
            replacement,
        })
    }

    pub fn region(&self) -> Range {
        self.region
    }

    pub fn original(&self) -> &[Nucleotide] {
        &self.original
    }

    pub fn replacement(&self) -> &[Nucleotide] {
        &self.replacement
    }

    /// Replacement length minus original length
    pub fn bases_added(&self) -> i64 {
        self.replacement.len() as i64 - self.original.len() as i64
    }

    /// Apply to a gapped reference
    pub fn edit_reference<S: GappedSequence + ?Sized>(
        &self,
        reference: &S,
    ) -> SliceResult<AppliedRnaEdit> {
        let last = self.region.end() as usize;
        if last >= reference.ungapped_len() {
            return Err(SliceError::InvalidEdit(format!(
                "region {} lies past the reference's {} bases",
                self.region,
                reference.ungapped_len()
            )));
        }
        let gapped_begin = reference.ungapped_to_gapped(self.region.begin() as usize);
        let gapped_end = reference.ungapped_to_gapped(last);

        let symbols = reference.to_vec();
        let region = &symbols[gapped_begin..=gapped_end];
        let content: Vec<Nucleotide> = region.iter().copied().filter(|n| !n.is_gap()).collect();
        if content != self.original {
            return Err(SliceError::InvalidEdit(format!(
                "reference holds {} at {} but edit expects {}",
                crate::core::dna::to_string(&content),
                self.region,
                crate::core::dna::to_string(&self.original)
            )));
        }

        let capacity = (symbols.len() as i64 + self.bases_added()).max(0) as usize;
        let mut edited = Vec::with_capacity(capacity);
        edited.extend_from_slice(&symbols[..gapped_begin]);
        edited.extend(replace_preserving_gaps(region, &self.replacement));
        edited.extend_from_slice(&symbols[gapped_end + 1..]);

        Ok(AppliedRnaEdit {
            edit: self.clone(),
            original_gapped_range: Range::new(gapped_begin as i64, gapped_end as i64)?,
            edited_reference: Arc::new(NucleotideSequence::new(&edited)?),
        })
    }
}

/// Fill the non-gap columns of `region` with `replacement` in order, keeping gaps where
/// they were. Surplus columns are dropped; surplus bases go at the end.
fn replace_preserving_gaps(region: &[Nucleotide], replacement: &[Nucleotide]) -> Vec<Nucleotide> {
    let mut out = Vec::with_capacity(region.len().max(replacement.len()));
    let mut bases = replacement.iter().copied();
    for &symbol in region {
        if symbol.is_gap() {
            out.push(symbol);
        } else if let Some(base) = bases.next() {
            out.push(base);
        }
    }
    out.extend(bases);
    out
}

/// How a read was carried across an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadEditKind {
    /// Read does not touch the edited region
    Unchanged,
    /// Read covers only part of the region; padded or trimmed
    Partial,
    /// Read covers the region with the expected content; replaced
    Replaced,
    /// Read covers the region but its content differs; padded or trimmed
    Diverged,
}

/// Read symbols after an edit was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedRead {
    pub symbols: Vec<Nucleotide>,
    pub kind: ReadEditKind,
}

/// An edit applied to a concrete reference
#[derive(Debug, Clone)]
pub struct AppliedRnaEdit {
    edit: RnaEdit,
    original_gapped_range: Range,
    edited_reference: Arc<NucleotideSequence>,
}

impl AppliedRnaEdit {
    pub fn edit(&self) -> &RnaEdit {
        &self.edit
    }

    /// Gapped span of the region before editing
    pub fn original_gapped_range(&self) -> Range {
        self.original_gapped_range
    }

    pub fn edited_reference(&self) -> &Arc<NucleotideSequence> {
        &self.edited_reference
    }

    pub fn bases_added(&self) -> i64 {
        self.edit.bases_added()
    }

    /// Gapped span of the region after editing
    pub fn edited_range(&self) -> Range {
        let r = self.original_gapped_range;
        Range::new(r.begin(), r.end() + self.bases_added())
            .unwrap_or_else(|_| Range::empty_at(r.begin()))
    }

    /// Move a pre-edit column into the edited frame
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::{dna::parse_nucleotides, NucleotideSequence, Range};
    /// use fast_slicemap::pileup::RnaEdit;
    ///
    /// let reference: NucleotideSequence = "AACGTAAAAAAA".parse().unwrap();
    /// let edit = RnaEdit::new(
    ///     Range::new(2, 4).unwrap(),
    ///     parse_nucleotides("CGT").unwrap(),
    ///     parse_nucleotides("CAGT").unwrap(),
    /// )
    /// .unwrap();
    /// let applied = edit.edit_reference(&reference).unwrap();
    /// assert_eq!(applied.adjust_start_offset(10), 11);
    /// assert_eq!(applied.adjust_start_offset(3), 3);
    /// ```
    pub fn adjust_start_offset(&self, offset: i64) -> i64 {
        if offset > self.original_gapped_range.end() {
            offset + self.bases_added()
        } else {
            offset
        }
    }

    /// Move a pre-edit gapped range into the edited frame
    ///
    /// A range ending at or after the region's last column grows or shrinks with it.
    pub fn adjust_range(&self, range: &Range) -> Range {
        let begin = self.adjust_start_offset(range.begin());
        let end = if range.end() >= self.original_gapped_range.end() {
            range.end() + self.bases_added()
        } else {
            range.end()
        };
        Range::new(begin, end).unwrap_or_else(|_| Range::empty_at(begin))
    }

    /// Carry a read placed at `read_range` (pre-edit gapped columns) across the edit
    ///
    /// `read_range` must span exactly `read.len()` columns.
    pub fn edit_read(&self, read: &[Nucleotide], read_range: &Range) -> SliceResult<EditedRead> {
        if read_range.len() != read.len() as u64 {
            return Err(SliceError::InvalidEdit(format!(
                "read of {} symbols placed at {} spanning {} columns",
                read.len(),
                read_range,
                read_range.len()
            )));
        }
        let region = self.original_gapped_range;
        if !read_range.intersects(&region) {
            return Ok(EditedRead {
                symbols: read.to_vec(),
                kind: ReadEditKind::Unchanged,
            });
        }

        let overlap = read_range.intersection(&region);
        let local_begin = (overlap.begin() - read_range.begin()) as usize;
        let local_end = (overlap.end() - read_range.begin()) as usize;

        if overlap != region {
            return Ok(EditedRead {
                symbols: self.pad(read, local_begin, local_end),
                kind: ReadEditKind::Partial,
            });
        }

        let covered = &read[local_begin..=local_end];
        let content: Vec<Nucleotide> = covered.iter().copied().filter(|n| !n.is_gap()).collect();
        if !content.is_empty() && content == self.edit.original {
            let mut symbols = Vec::with_capacity(read.len() + self.edit.replacement.len());
            symbols.extend_from_slice(&read[..local_begin]);
            symbols.extend(replace_preserving_gaps(covered, &self.edit.replacement));
            symbols.extend_from_slice(&read[local_end + 1..]);
            return Ok(EditedRead {
                symbols,
                kind: ReadEditKind::Replaced,
            });
        }

        debug!(
            "Read content {} over {} differs from edit original {}, padding",
            crate::core::dna::to_string(&content),
            region,
            crate::core::dna::to_string(&self.edit.original)
        );
        Ok(EditedRead {
            symbols: self.pad(read, local_begin, local_end),
            kind: ReadEditKind::Diverged,
        })
    }

    /// Insert `bases_added` gaps after local column `local_end`, or remove that many
    /// columns ending there when negative
    fn pad(&self, read: &[Nucleotide], local_begin: usize, local_end: usize) -> Vec<Nucleotide> {
        let added = self.bases_added();
        let mut symbols = read.to_vec();
        if added > 0 {
            let tail = symbols.split_off(local_end + 1);
            symbols.extend(std::iter::repeat(Nucleotide::Gap).take(added as usize));
            symbols.extend(tail);
        } else if added < 0 {
            let remove_from = (local_end + 1)
                .saturating_sub(added.unsigned_abs() as usize)
                .max(local_begin);
            symbols.drain(remove_from..=local_end);
        }
        symbols
    }
}
