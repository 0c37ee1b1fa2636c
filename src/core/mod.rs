//! Core sequence representation
//!
//! This module contains the interval algebra, the nucleotide alphabet and its compact
//! codec, and the gapped / reference-relative sequence types.

pub mod codec;
pub mod dna;
mod error;
pub mod range;
mod reference;
mod sequence;
mod strand;

pub use dna::Nucleotide;
pub use error::{
    CodecError, CodecResult, FastSliceMapError, RangeError, RangeResult, Result,
    SequenceError, SequenceResult, SliceError, SliceResult,
};
pub use range::{CoordinateSystem, DirectedRange, Range, RangeBuilder};
pub use reference::ReferenceEncodedSequence;
pub use sequence::{GappedSequence, NucleotideSequence};
pub use strand::Strand;
