//! Per-base quality values and gap quality policies

use crate::core::{GappedSequence, SliceError, SliceResult, Strand};
use crate::pileup::read::AlignedRead;
use std::collections::HashMap;

/// Phred-scaled base quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Quality(pub u8);

impl Quality {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for Quality {
    fn from(value: u8) -> Self {
        Quality(value)
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Full-length, ungapped qualities in the read's original orientation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QualitySequence(Vec<Quality>);

impl QualitySequence {
    pub fn new(values: Vec<Quality>) -> Self {
        Self(values)
    }

    /// Build from raw phred values
    pub fn from_values(values: &[u8]) -> Self {
        Self(values.iter().copied().map(Quality).collect())
    }

    /// Same quality at every position
    pub fn uniform(quality: Quality, len: usize) -> Self {
        Self(vec![quality; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Quality> {
        self.0.get(index).copied()
    }
}

/// Lookup of quality sequences by read id
pub trait QualityProvider: Send + Sync {
    fn quality(&self, id: &str) -> Option<&QualitySequence>;
}

impl QualityProvider for HashMap<String, QualitySequence> {
    fn quality(&self, id: &str) -> Option<&QualitySequence> {
        self.get(id)
    }
}

/// How a gap column gets its quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapQualityStrategy {
    /// Lower of the two flanking base qualities; `Quality(1)` when the gap run touches
    /// either end of the read
    #[default]
    LowestFlanking,
    /// Every gap scores zero
    AlwaysZero,
}

/// Quality assigned to gaps at a read end under [`GapQualityStrategy::LowestFlanking`]
pub const READ_END_GAP_QUALITY: Quality = Quality(1);

impl GapQualityStrategy {
    /// Resolve one quality per gapped position of `read`
    ///
    /// Ungapped alignment index `u` reads quality `valid.begin + u` on the forward
    /// strand and `valid.end - u` on the reverse strand.
    pub fn gapped_qualities<S: GappedSequence>(
        &self,
        read: &AlignedRead<S>,
        qualities: &QualitySequence,
    ) -> SliceResult<Vec<Quality>> {
        let valid = read.valid_range;
        let mut resolved = Vec::with_capacity(read.sequence.len());
        let mut ungapped = 0i64;
        for i in 0..read.sequence.len() {
            if read.sequence.is_gap(i) {
                resolved.push(None);
                continue;
            }
            let index = match read.strand {
                Strand::Forward => valid.begin() + ungapped,
                Strand::Reverse => valid.end() - ungapped,
            };
            let quality = usize::try_from(index)
                .ok()
                .and_then(|idx| qualities.get(idx))
                .ok_or_else(|| SliceError::QualityIndexOutOfBounds {
                    id: read.id.to_string(),
                    index,
                    len: qualities.len(),
                })?;
            resolved.push(Some(quality));
            ungapped += 1;
        }
        Ok(self.fill_gaps(&resolved))
    }

    /// Replace every `None` (gap) with a quality according to the strategy
    pub fn fill_gaps(&self, qualities: &[Option<Quality>]) -> Vec<Quality> {
        match self {
            GapQualityStrategy::AlwaysZero => qualities
                .iter()
                .map(|q| q.unwrap_or(Quality(0)))
                .collect(),
            GapQualityStrategy::LowestFlanking => {
                let mut next = vec![None; qualities.len()];
                let mut seen = None;
                for (i, q) in qualities.iter().enumerate().rev() {
                    if q.is_some() {
                        seen = *q;
                    }
                    next[i] = seen;
                }

                let mut previous = None;
                qualities
                    .iter()
                    .zip(next)
                    .map(|(q, following)| match q {
                        Some(quality) => {
                            previous = Some(*quality);
                            *quality
                        }
                        None => match (previous, following) {
                            (Some(left), Some(right)) => left.min(right),
                            _ => READ_END_GAP_QUALITY,
                        },
                    })
                    .collect()
            }
        }
    }
}
