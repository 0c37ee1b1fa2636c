//! Read aggregation
//!
//! - Fixed-width: one [`Slice`] per reference column ([`SliceMapBuilder`])
//! - Variable-width: counts per window of ungapped reference bases
//!   ([`VariableWidthSliceMapBuilder`], [`CodonSliceMapBuilder`])
//! - [`CoverageMap`]: depth and overlap queries over read spans

pub mod codon;
pub mod coverage;
pub mod edit;
pub mod quality;
pub mod read;
pub mod slice;
pub mod slicemap;
pub mod variable;

pub use codon::{CodonSliceMapBuilder, CODON_LENGTH};
pub use coverage::CoverageMap;
pub use edit::{AppliedRnaEdit, EditedRead, ReadEditKind, RnaEdit};
pub use quality::{GapQualityStrategy, Quality, QualityProvider, QualitySequence};
pub use read::{consume, AlignedRead, BuildStats, ReadSource, ReadStream, VecReadSource};
pub use slice::{Slice, SliceElement, EMPTY_SLICE};
pub use slicemap::{SliceMap, SliceMapBuilder};
pub use variable::{
    VariableWidthSlice, VariableWidthSliceElement, VariableWidthSliceMap,
    VariableWidthSliceMapBuilder,
};
