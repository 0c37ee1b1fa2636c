//! Column slices
//!
//! Every element is packed into one `u16`:
//!
//! ```text
//!  15            8   7    6..4   3..0
//! [   quality    ][strand][ 0 ][ code ]
//! ```

use crate::core::{Nucleotide, Strand};
use crate::pileup::quality::Quality;
use std::collections::BTreeMap;
use std::sync::Arc;

const STRAND_SHIFT: u16 = 7;
const QUALITY_SHIFT: u16 = 8;
const CODE_MASK: u16 = 0x000F;

/// Pack one observation into its compact form
#[inline]
pub fn pack(base: Nucleotide, quality: Quality, strand: Strand) -> u16 {
    ((quality.0 as u16) << QUALITY_SHIFT)
        | ((strand.bit() as u16) << STRAND_SHIFT)
        | base.code() as u16
}

/// One read's contribution to a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceElement {
    pub id: Arc<str>,
    pub base: Nucleotide,
    pub quality: Quality,
    pub strand: Strand,
}

impl SliceElement {
    fn unpack(id: &Arc<str>, packed: u16) -> Self {
        Self {
            id: id.clone(),
            base: Nucleotide::from_code((packed & CODE_MASK) as u8),
            quality: Quality((packed >> QUALITY_SHIFT) as u8),
            strand: Strand::from_bit((packed >> STRAND_SHIFT) as u8),
        }
    }
}

/// All observations at one alignment column, ordered by read id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Slice {
    ids: Vec<Arc<str>>,
    packed: Vec<u16>,
    consensus: Option<Nucleotide>,
}

/// Shared zero-coverage slice
pub static EMPTY_SLICE: Slice = Slice {
    ids: Vec::new(),
    packed: Vec::new(),
    consensus: None,
};

impl Slice {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from packed observations in any order
    pub fn from_packed(mut elements: Vec<(Arc<str>, u16)>, consensus: Option<Nucleotide>) -> Self {
        elements.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        let (ids, packed) = elements.into_iter().unzip();
        Self {
            ids,
            packed,
            consensus,
        }
    }

    pub fn from_elements(elements: &[SliceElement], consensus: Option<Nucleotide>) -> Self {
        Self::from_packed(
            elements
                .iter()
                .map(|e| (e.id.clone(), pack(e.base, e.quality, e.strand)))
                .collect(),
            consensus,
        )
    }

    /// Number of reads covering the column
    #[inline]
    pub fn coverage_depth(&self) -> usize {
        self.packed.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.packed.is_empty()
    }

    pub fn consensus(&self) -> Option<Nucleotide> {
        self.consensus
    }

    pub fn iter(&self) -> impl Iterator<Item = SliceElement> + '_ {
        self.ids
            .iter()
            .zip(&self.packed)
            .map(|(id, &packed)| SliceElement::unpack(id, packed))
    }

    /// Element contributed by read `id`
    pub fn get(&self, id: &str) -> Option<SliceElement> {
        let idx = self.ids.binary_search_by(|probe| (**probe).cmp(id)).ok()?;
        Some(SliceElement::unpack(&self.ids[idx], self.packed[idx]))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.binary_search_by(|probe| (**probe).cmp(id)).is_ok()
    }

    /// Histogram of observed symbols
    pub fn nucleotide_counts(&self) -> BTreeMap<Nucleotide, usize> {
        let mut counts = BTreeMap::new();
        for &p in &self.packed {
            *counts
                .entry(Nucleotide::from_code((p & CODE_MASK) as u8))
                .or_insert(0) += 1;
        }
        counts
    }

    pub fn count_for_strand(&self, strand: Strand) -> usize {
        self.packed
            .iter()
            .filter(|&&p| Strand::from_bit((p >> STRAND_SHIFT) as u8) == strand)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(id: &str, base: Nucleotide, q: u8, strand: Strand) -> SliceElement {
        SliceElement {
            id: Arc::from(id),
            base,
            quality: Quality(q),
            strand,
        }
    }

    #[test]
    fn test_pack_layout() {
        let p = pack(Nucleotide::Thymine, Quality(40), Strand::Reverse);
        assert_eq!(p, (40 << 8) | (1 << 7) | 15);
    }

    #[test]
    fn test_round_trip_and_order() {
        let slice = Slice::from_elements(
            &[
                element("read2", Nucleotide::Gap, 5, Strand::Forward),
                element("read1", Nucleotide::Adenine, 255, Strand::Reverse),
            ],
            Some(Nucleotide::Adenine),
        );
        let elements: Vec<SliceElement> = slice.iter().collect();
        assert_eq!(elements[0], element("read1", Nucleotide::Adenine, 255, Strand::Reverse));
        assert_eq!(elements[1], element("read2", Nucleotide::Gap, 5, Strand::Forward));
        assert_eq!(slice.consensus(), Some(Nucleotide::Adenine));
        assert_eq!(slice.get("read2").unwrap().quality, Quality(5));
        assert!(slice.get("read3").is_none());
        assert!(slice.contains("read1"));
    }

    #[test]
    fn test_counts() {
        let slice = Slice::from_elements(
            &[
                element("a", Nucleotide::Cytosine, 30, Strand::Forward),
                element("b", Nucleotide::Cytosine, 30, Strand::Reverse),
                element("c", Nucleotide::Guanine, 30, Strand::Forward),
            ],
            None,
        );
        assert_eq!(slice.coverage_depth(), 3);
        assert_eq!(slice.nucleotide_counts().get(&Nucleotide::Cytosine), Some(&2));
        assert_eq!(slice.count_for_strand(Strand::Forward), 2);
    }

    #[test]
    fn test_empty_slice() {
        assert_eq!(EMPTY_SLICE.coverage_depth(), 0);
        assert!(EMPTY_SLICE.is_empty());
        assert_eq!(EMPTY_SLICE.iter().count(), 0);
        assert_eq!(Slice::empty(), EMPTY_SLICE);
    }
}
