//! Error types for FastSliceMap
//!
//! Defines all error types used throughout the library.

use thiserror::Error;

/// Main error type for FastSliceMap operations
#[derive(Debug, Error)]
pub enum FastSliceMapError {
    /// Interval construction and parsing errors
    #[error("Range error: {0}")]
    Range(#[from] RangeError),

    /// Compact codec errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Sequence access and translation errors
    #[error("Sequence error: {0}")]
    Sequence(#[from] SequenceError),

    /// Slice and window aggregation errors
    #[error("Slice error: {0}")]
    Slice(#[from] SliceError),
}

/// Errors raised while building or parsing ranges
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// End lies before `start - 1`
    #[error("Invalid range: end ({end}) must be >= start - 1 (start = {start})")]
    InvalidRange { start: i64, end: i64 },

    /// Text could not be read as a range
    #[error("Cannot parse range from '{0}'")]
    Unparseable(String),

    /// Split requested with a zero chunk length
    #[error("Split length must be greater than 0")]
    InvalidSplitLength,
}

/// Errors raised by the 4-bit nucleotide codec
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Random access past the encoded symbol count
    #[error("Index {index} out of bounds for encoded sequence of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Header and payload disagree, or the buffer is too short
    #[error("Corrupt encoding: {0}")]
    CorruptEncoding(String),

    /// Symbol count does not fit the 4-byte header
    #[error("Sequence of {0} symbols is too long to encode")]
    TooLong(usize),
}

/// Errors raised by gapped sequence access
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// Character is not a nucleotide symbol
    #[error("Invalid nucleotide '{symbol}' at position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    /// Index past the end of the sequence
    #[error("Index {index} out of bounds for sequence of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A gap has no ungapped coordinate
    #[error("Position {0} is a gap")]
    PositionIsGap(usize),

    /// Underlying codec failure
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Errors raised while aggregating reads into slices or windows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SliceError {
    /// Window width does not evenly divide the ungapped reference length
    #[error("Window width {width} does not evenly divide ungapped length {ungapped_length}")]
    UnalignedWidth { ungapped_length: usize, width: usize },

    /// No quality sequence is available for a read
    #[error("No quality data for read '{0}'")]
    MissingQualityData(String),

    /// Quality sequence is shorter than the read's valid range requires
    #[error("Quality index {index} out of bounds for read '{id}' with {len} qualities")]
    QualityIndexOutOfBounds { id: String, index: i64, len: usize },

    /// Edit region or content is inconsistent with the reference
    #[error("Invalid RNA edit: {0}")]
    InvalidEdit(String),

    /// Read source failed to produce or release reads
    #[error("Read source error: {0}")]
    ReadSource(String),

    /// Worker pool could not be created
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(String),

    /// Range error while locating a read
    #[error("Range error: {0}")]
    Range(#[from] RangeError),

    /// Sequence error while reading symbols
    #[error("Sequence error: {0}")]
    Sequence(#[from] SequenceError),
}

impl From<CodecError> for SliceError {
    fn from(e: CodecError) -> Self {
        SliceError::Sequence(SequenceError::Codec(e))
    }
}

/// Result type alias for FastSliceMap operations
pub type Result<T> = std::result::Result<T, FastSliceMapError>;

/// Result type alias for range operations
pub type RangeResult<T> = std::result::Result<T, RangeError>;

/// Result type alias for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Result type alias for sequence operations
pub type SequenceResult<T> = std::result::Result<T, SequenceError>;

/// Result type alias for aggregation operations
pub type SliceResult<T> = std::result::Result<T, SliceError>;
