//! Codon (width 3) aggregation with an optional RNA edit

use crate::core::{GappedSequence, NucleotideSequence, Range, SliceResult};
use crate::pileup::edit::{AppliedRnaEdit, RnaEdit};
use crate::pileup::read::{add_parallel, drain_reads, AlignedRead, BuildStats, ReadSource};
use crate::pileup::variable::{VariableWidthSliceMap, VariableWidthSliceMapBuilder};
use log::info;

/// Bases per codon
pub const CODON_LENGTH: usize = 3;

/// Builds codon windows, carrying every read across an RNA edit first when one is set
pub struct CodonSliceMapBuilder {
    edit: Option<AppliedRnaEdit>,
    inner: VariableWidthSliceMapBuilder,
}

impl CodonSliceMapBuilder {
    /// Codons over the whole reference
    pub fn new<S: GappedSequence + ?Sized>(reference: &S) -> SliceResult<Self> {
        Self::with_options(reference, None, None)
    }

    /// Codons over `gapped_range` (pre-edit columns), with `edit` applied to the
    /// reference up front
    pub fn with_options<S: GappedSequence + ?Sized>(
        reference: &S,
        gapped_range: Option<Range>,
        edit: Option<&RnaEdit>,
    ) -> SliceResult<Self> {
        match edit {
            Some(edit) => {
                let applied = edit.edit_reference(reference)?;
                let range = gapped_range.map(|r| applied.adjust_range(&r));
                info!(
                    "Applied RNA edit at {} ({:+} bases)",
                    applied.original_gapped_range(),
                    applied.bases_added()
                );
                let inner = VariableWidthSliceMapBuilder::with_optional_range(
                    applied.edited_reference().as_ref(),
                    CODON_LENGTH,
                    range,
                )?;
                Ok(Self {
                    edit: Some(applied),
                    inner,
                })
            }
            None => Ok(Self {
                edit: None,
                inner: VariableWidthSliceMapBuilder::with_optional_range(
                    reference,
                    CODON_LENGTH,
                    gapped_range,
                )?,
            }),
        }
    }

    pub fn rna_edit(&self) -> Option<&AppliedRnaEdit> {
        self.edit.as_ref()
    }

    pub fn num_codons(&self) -> usize {
        self.inner.num_windows()
    }

    /// Count `read` placed at pre-edit gapped column `offset`
    pub fn add<S: GappedSequence + ?Sized>(&self, offset: i64, read: &S) -> SliceResult<usize> {
        let Some(applied) = &self.edit else {
            return self.inner.add(offset, read);
        };
        let read_range = Range::of_length(read.len() as u64).shift(offset);
        let edited = applied.edit_read(&read.to_vec(), &read_range)?;
        let sequence = NucleotideSequence::new(&edited.symbols)?;
        self.inner.add(applied.adjust_start_offset(offset), &sequence)
    }

    pub fn add_read<S: GappedSequence>(&self, read: &AlignedRead<S>) -> SliceResult<usize> {
        self.add(read.offset, &read.sequence)
    }

    /// Sequentially add every read from `source`, closing it once when done
    pub fn add_reads<R: ReadSource>(&self, source: R) -> SliceResult<BuildStats> {
        let stats = drain_reads(source, |read| self.add_read(read).map(|_| ()))?;
        info!(
            "Counted {} of {} reads into {} codons ({} skipped)",
            stats.added,
            stats.total,
            self.num_codons(),
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
            "Counted {} of {} reads into {} codons on {} threads ({} skipped)",
            stats.added,
            stats.total,
            self.num_codons(),
            threads,
            stats.skipped
        );
        Ok(stats)
    }

    pub fn build(self) -> VariableWidthSliceMap {
        self.inner.build()
    }
}
