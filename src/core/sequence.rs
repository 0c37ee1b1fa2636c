//! Gapped nucleotide sequences
//!
//! A gapped sequence indexes alignment columns ("gapped" coordinates). Removing the gap
//! columns gives the "ungapped" coordinates. Translation between the two uses binary
//! search over the sorted gap offsets.

use crate::core::codec;
use crate::core::dna::{self, Nucleotide};
use crate::core::error::{SequenceError, SequenceResult};
use crate::core::range::Range;
use std::str::FromStr;

/// Read access to a sequence of nucleotides that may contain gaps
pub trait GappedSequence: Send + Sync {
    /// Number of gapped positions
    fn len(&self) -> usize;

    /// Symbol at a gapped index, `None` past the end
    fn symbol(&self, index: usize) -> Option<Nucleotide>;

    /// Sorted gapped offsets of every gap
    fn gap_offsets(&self) -> &[usize];

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checked access by gapped index
    fn get(&self, index: usize) -> SequenceResult<Nucleotide> {
        self.symbol(index).ok_or(SequenceError::IndexOutOfBounds {
            index,
            len: self.len(),
        })
    }

    fn num_gaps(&self) -> usize {
        self.gap_offsets().len()
    }

    fn ungapped_len(&self) -> usize {
        self.len() - self.num_gaps()
    }

    fn is_gap(&self, index: usize) -> bool {
        self.gap_offsets().binary_search(&index).is_ok()
    }

    /// Gaps at or before `index`
    fn num_gaps_until(&self, index: usize) -> usize {
        self.gap_offsets().partition_point(|&g| g <= index)
    }

    /// Ungapped coordinate of a non-gap gapped index
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::{GappedSequence, NucleotideSequence};
    ///
    /// let seq: NucleotideSequence = "AC--GT".parse().unwrap();
    /// assert_eq!(seq.gapped_to_ungapped(4).unwrap(), 2);
    /// assert!(seq.gapped_to_ungapped(2).is_err());
    /// ```
    fn gapped_to_ungapped(&self, index: usize) -> SequenceResult<usize> {
        if index >= self.len() {
            return Err(SequenceError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }
        if self.is_gap(index) {
            return Err(SequenceError::PositionIsGap(index));
        }
        Ok(index - self.num_gaps_until(index))
    }

    /// Gapped coordinate of the `ungapped`-th non-gap symbol
    ///
    /// Indices at or past the ungapped length map past the last column, one column per
    /// extra position.
    fn ungapped_to_gapped(&self, ungapped: usize) -> usize {
        // gaps[i] - i counts the bases before gap i and never decreases
        let gaps = self.gap_offsets();
        let (mut lo, mut hi) = (0, gaps.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if gaps[mid] - mid <= ungapped {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        ungapped + lo
    }

    /// Symbols in gapped order
    fn iter(&self) -> Box<dyn Iterator<Item = Nucleotide> + '_> {
        Box::new((0..self.len()).map_while(move |i| self.symbol(i)))
    }

    /// Symbols with gaps removed
    fn ungapped(&self) -> Vec<Nucleotide> {
        self.iter().filter(|n| !n.is_gap()).collect()
    }

    /// Gapped symbols copied out
    fn to_vec(&self) -> Vec<Nucleotide> {
        self.iter().collect()
    }
}

/// Codec-backed gapped sequence
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NucleotideSequence {
    encoded: Vec<u8>,
    len: usize,
    gaps: Vec<usize>,
}

impl NucleotideSequence {
    /// Encode `symbols` and index their gaps
    pub fn new(symbols: &[Nucleotide]) -> SequenceResult<Self> {
        let encoded = codec::encode(symbols)?;
        let gaps = symbols
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_gap())
            .map(|(i, _)| i)
            .collect();
        Ok(Self {
            encoded,
            len: symbols.len(),
            gaps,
        })
    }

    /// Wrap an existing codec buffer
    pub fn from_encoded(encoded: Vec<u8>) -> SequenceResult<Self> {
        let symbols = codec::decode(&encoded)?;
        let gaps = symbols
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_gap())
            .map(|(i, _)| i)
            .collect();
        Ok(Self {
            encoded,
            len: symbols.len(),
            gaps,
        })
    }

    pub fn empty() -> Self {
        Self {
            encoded: vec![0; codec::HEADER_SIZE],
            len: 0,
            gaps: Vec::new(),
        }
    }

    /// Raw codec bytes
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// Gapped sub-sequence covering `range`, clamped to the sequence
    pub fn sub_sequence(&self, range: &Range) -> SequenceResult<Self> {
        let whole = Range::of_length(self.len as u64);
        let clamped = range.intersection(&whole);
        if clamped.is_empty() {
            return Ok(Self::empty());
        }
        let symbols: Vec<Nucleotide> = (clamped.begin() as usize..=clamped.end() as usize)
            .map(|i| self.get(i))
            .collect::<SequenceResult<_>>()?;
        Self::new(&symbols)
    }

    /// Reverse complement, gaps included
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::NucleotideSequence;
    ///
    /// let seq: NucleotideSequence = "AAC-GT".parse().unwrap();
    /// assert_eq!(seq.reverse_complement().unwrap().to_string(), "AC-GTT");
    /// ```
    pub fn reverse_complement(&self) -> SequenceResult<Self> {
        let encoded = codec::reverse_complement(&self.encoded)?;
        let mut gaps: Vec<usize> = self.gaps.iter().map(|g| self.len - 1 - g).collect();
        gaps.reverse();
        Ok(Self {
            encoded,
            len: self.len,
            gaps,
        })
    }
}

impl GappedSequence for NucleotideSequence {
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn symbol(&self, index: usize) -> Option<Nucleotide> {
        codec::decode_at(&self.encoded, index).ok()
    }

    fn gap_offsets(&self) -> &[usize] {
        &self.gaps
    }
}

impl FromStr for NucleotideSequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(&dna::parse_nucleotides(s)?)
    }
}

impl std::fmt::Display for NucleotideSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for n in self.iter() {
            write!(f, "{}", n)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for NucleotideSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NucleotideSequence")
            .field("len", &self.len)
            .field("gaps", &self.gaps.len())
            .field("symbols", &self.to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_whitespace() {
        let seq: NucleotideSequence = "AC GT\n--A".parse().unwrap();
        assert_eq!(seq.to_string(), "ACGT--A");
        assert_eq!(seq.len(), 7);
        assert_eq!(seq.gap_offsets(), &[4, 5]);
        assert_eq!(seq.ungapped_len(), 5);
    }

    #[test]
    fn test_invalid_symbol() {
        let err = "ACJT".parse::<NucleotideSequence>().unwrap_err();
        assert_eq!(err, SequenceError::InvalidSymbol { symbol: 'J', position: 2 });
    }

    #[test]
    fn test_gapped_ungapped_translation() {
        let seq: NucleotideSequence = "-A-CG--T".parse().unwrap();
        assert_eq!(seq.gapped_to_ungapped(1).unwrap(), 0);
        assert_eq!(seq.gapped_to_ungapped(3).unwrap(), 1);
        assert_eq!(seq.gapped_to_ungapped(4).unwrap(), 2);
        assert_eq!(seq.gapped_to_ungapped(7).unwrap(), 3);
        assert_eq!(seq.gapped_to_ungapped(0), Err(SequenceError::PositionIsGap(0)));
        assert!(matches!(
            seq.gapped_to_ungapped(8),
            Err(SequenceError::IndexOutOfBounds { .. })
        ));

        for u in 0..seq.ungapped_len() {
            let g = seq.ungapped_to_gapped(u);
            assert!(!seq.is_gap(g));
            assert_eq!(seq.gapped_to_ungapped(g).unwrap(), u);
        }
        assert_eq!(seq.ungapped_to_gapped(0), 1);
        assert_eq!(seq.ungapped_to_gapped(3), 7);
        // past the last base, one column per extra position
        assert_eq!(seq.ungapped_to_gapped(4), 8);
        assert_eq!(seq.num_gaps_until(2), 2);
        assert_eq!(seq.num_gaps_until(7), 4);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let seq: NucleotideSequence = "ACG".parse().unwrap();
        assert_eq!(seq.get(1).unwrap(), Nucleotide::Cytosine);
        assert_eq!(
            seq.get(3),
            Err(SequenceError::IndexOutOfBounds { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_sub_sequence() {
        let seq: NucleotideSequence = "ACG-TTA".parse().unwrap();
        let sub = seq.sub_sequence(&Range::new(2, 4).unwrap()).unwrap();
        assert_eq!(sub.to_string(), "G-T");
        assert_eq!(sub.gap_offsets(), &[1]);
        let clamped = seq.sub_sequence(&Range::new(5, 20).unwrap()).unwrap();
        assert_eq!(clamped.to_string(), "TA");
        assert!(seq.sub_sequence(&Range::new(20, 30).unwrap()).unwrap().is_empty());
    }

    #[test]
    fn test_reverse_complement_gaps() {
        let seq: NucleotideSequence = "A-CGT--".parse().unwrap();
        let rc = seq.reverse_complement().unwrap();
        assert_eq!(rc.to_string(), "--ACG-T");
        assert_eq!(rc.gap_offsets(), &[0, 1, 5]);
    }

    #[test]
    fn test_from_encoded() {
        let seq: NucleotideSequence = "AC-T".parse().unwrap();
        let copy = NucleotideSequence::from_encoded(seq.encoded().to_vec()).unwrap();
        assert_eq!(copy, seq);
        assert!(NucleotideSequence::from_encoded(vec![0, 1]).is_err());
    }
}
