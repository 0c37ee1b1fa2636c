//! FastSliceMap - compact gapped sequences and parallel read aggregation
//!
//! Stores gapped nucleotide sequences in a 4-bit code, relates reads to a reference,
//! and tallies many overlapping reads per column or per codon.
//!
//! # Features
//!
//! - 4-bit nucleotide codec with nibble-swap reverse complement
//! - Closed-interval algebra with zero-based, residue-based and space-based display
//! - Reference-relative sequence encoding
//! - Parallel per-column and per-window aggregation with rayon
//!
//! # Example
//!
//! ```
//! use fast_slicemap::{AlignedRead, NucleotideSequence, Quality, SliceMapBuilder, Strand};
//!
//! let builder = SliceMapBuilder::new(4).default_quality(Quality(30));
//! let read: NucleotideSequence = "ACGT".parse().unwrap();
//! builder
//!     .add_read(&AlignedRead::new("r1", 0, Strand::Forward, read))
//!     .unwrap();
//! let map = builder.build();
//! assert_eq!(map.get_slice(2).unwrap().coverage_depth(), 1);
//! ```

pub mod core;
pub mod pileup;

// Re-export commonly used types
pub use crate::core::{
    CoordinateSystem, DirectedRange, FastSliceMapError, GappedSequence, Nucleotide,
    NucleotideSequence, Range, RangeBuilder, ReferenceEncodedSequence, SliceError, Strand,
};
pub use crate::pileup::{
    AlignedRead, CodonSliceMapBuilder, GapQualityStrategy, Quality, RnaEdit, Slice,
    SliceMap, SliceMapBuilder, VariableWidthSliceMap, VariableWidthSliceMapBuilder,
};
