//! Nucleotide alphabet
//!
//! Sixteen symbols: the four bases, ten two/three-base IUPAC ambiguity codes, `N` and
//! the alignment gap. Each symbol owns a 4-bit code chosen so that flipping all four bits
//! yields the complement for every complementary pair; the four self-complementary
//! symbols (`W`, `N`, gap, `S`) are listed in [`SELF_COMPLEMENT_MASK`].

use crate::core::error::{SequenceError, SequenceResult};

/// A single nucleotide symbol, discriminant = 4-bit code
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Nucleotide {
    Adenine = 0,
    Cytosine = 1,
    /// R: A or G
    Purine = 2,
    /// K: G or T
    Keto = 3,
    /// B: C, G or T
    NotAdenine = 4,
    /// D: A, G or T
    NotCytosine = 5,
    /// W: A or T
    Weak = 6,
    /// N: any base
    Unknown = 7,
    Gap = 8,
    /// S: C or G
    Strong = 9,
    /// H: A, C or T
    NotGuanine = 10,
    /// V: A, C or G
    NotThymine = 11,
    /// M: A or C
    Amino = 12,
    /// Y: C or T
    Pyrimidine = 13,
    Guanine = 14,
    Thymine = 15,
}

/// All symbols, indexed by code
pub const ALL: [Nucleotide; 16] = [
    Nucleotide::Adenine,
    Nucleotide::Cytosine,
    Nucleotide::Purine,
    Nucleotide::Keto,
    Nucleotide::NotAdenine,
    Nucleotide::NotCytosine,
    Nucleotide::Weak,
    Nucleotide::Unknown,
    Nucleotide::Gap,
    Nucleotide::Strong,
    Nucleotide::NotGuanine,
    Nucleotide::NotThymine,
    Nucleotide::Amino,
    Nucleotide::Pyrimidine,
    Nucleotide::Guanine,
    Nucleotide::Thymine,
];

const CHARS: [char; 16] = [
    'A', 'C', 'R', 'K', 'B', 'D', 'W', 'N', '-', 'S', 'H', 'V', 'M', 'Y', 'G', 'T',
];

const A: u8 = 0b0001;
const C: u8 = 0b0010;
const G: u8 = 0b0100;
const T: u8 = 0b1000;

/// Constituent bases per code, one bit per base (A=1, C=2, G=4, T=8)
const BASE_MASKS: [u8; 16] = [
    A,
    C,
    A | G,
    G | T,
    C | G | T,
    A | G | T,
    A | T,
    A | C | G | T,
    0,
    C | G,
    A | C | T,
    A | C | G,
    A | C,
    C | T,
    G,
    T,
];

/// Codes that complement to themselves: W(6), N(7), gap(8), S(9)
pub const SELF_COMPLEMENT_MASK: u16 = 0b0000_0011_1100_0000;

/// Complement of a 4-bit code
#[inline]
pub const fn complement_code(code: u8) -> u8 {
    if SELF_COMPLEMENT_MASK & (1 << code) != 0 {
        code
    } else {
        !code & 0x0F
    }
}

const fn build_match_table() -> [u16; 16] {
    let mut table = [0u16; 16];
    let mut i = 0;
    while i < 16 {
        let mut j = 0;
        while j < 16 {
            if i == j || BASE_MASKS[i] & BASE_MASKS[j] != 0 {
                table[i] |= 1 << j;
            }
            j += 1;
        }
        i += 1;
    }
    table
}

/// Row `i` has bit `j` set when codes `i` and `j` match
const MATCH_TABLE: [u16; 16] = build_match_table();

impl Nucleotide {
    /// Parse a single character (case-insensitive)
    ///
    /// `U` reads as `T`, `*` as a gap and `X` as `N`.
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::Nucleotide;
    ///
    /// assert_eq!(Nucleotide::from_char('a'), Some(Nucleotide::Adenine));
    /// assert_eq!(Nucleotide::from_char('U'), Some(Nucleotide::Thymine));
    /// assert_eq!(Nucleotide::from_char('*'), Some(Nucleotide::Gap));
    /// assert_eq!(Nucleotide::from_char('Z'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        let n = match c.to_ascii_uppercase() {
            'A' => Nucleotide::Adenine,
            'C' => Nucleotide::Cytosine,
            'G' => Nucleotide::Guanine,
            'T' | 'U' => Nucleotide::Thymine,
            'R' => Nucleotide::Purine,
            'Y' => Nucleotide::Pyrimidine,
            'K' => Nucleotide::Keto,
            'M' => Nucleotide::Amino,
            'S' => Nucleotide::Strong,
            'W' => Nucleotide::Weak,
            'B' => Nucleotide::NotAdenine,
            'D' => Nucleotide::NotCytosine,
            'H' => Nucleotide::NotGuanine,
            'V' => Nucleotide::NotThymine,
            'N' | 'X' => Nucleotide::Unknown,
            '-' | '*' => Nucleotide::Gap,
            _ => return None,
        };
        Some(n)
    }

    /// Canonical uppercase character
    #[inline]
    pub fn to_char(self) -> char {
        CHARS[self as usize]
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Symbol for the low four bits of `code`
    #[inline]
    pub fn from_code(code: u8) -> Self {
        ALL[(code & 0x0F) as usize]
    }

    /// Complementary symbol
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::Nucleotide;
    ///
    /// assert_eq!(Nucleotide::Adenine.complement(), Nucleotide::Thymine);
    /// assert_eq!(Nucleotide::Purine.complement(), Nucleotide::Pyrimidine);
    /// assert_eq!(Nucleotide::Strong.complement(), Nucleotide::Strong);
    /// ```
    #[inline]
    pub fn complement(self) -> Self {
        Self::from_code(complement_code(self.code()))
    }

    #[inline]
    pub fn is_gap(self) -> bool {
        self == Nucleotide::Gap
    }

    /// True for every symbol standing for more than one base
    #[inline]
    pub fn is_ambiguity(self) -> bool {
        BASE_MASKS[self as usize].count_ones() > 1
    }

    /// Constituent bases; empty for a gap
    pub fn bases(self) -> Vec<Nucleotide> {
        let mask = BASE_MASKS[self as usize];
        [
            (A, Nucleotide::Adenine),
            (C, Nucleotide::Cytosine),
            (G, Nucleotide::Guanine),
            (T, Nucleotide::Thymine),
        ]
        .into_iter()
        .filter(|(bit, _)| mask & bit != 0)
        .map(|(_, base)| base)
        .collect()
    }

    /// Two symbols match when equal or when they share a constituent base
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::Nucleotide;
    ///
    /// assert!(Nucleotide::Purine.matches(Nucleotide::Guanine));
    /// assert!(!Nucleotide::Purine.matches(Nucleotide::Pyrimidine));
    /// assert!(Nucleotide::Gap.matches(Nucleotide::Gap));
    /// ```
    #[inline]
    pub fn matches(self, other: Nucleotide) -> bool {
        MATCH_TABLE[self as usize] & (1 << other as u16) != 0
    }

    /// Narrowest symbol whose constituent bases cover every symbol in `symbols`
    ///
    /// An empty input (or gaps only) yields a gap.
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::Nucleotide;
    ///
    /// let r = Nucleotide::ambiguity_for(&[Nucleotide::Adenine, Nucleotide::Guanine]);
    /// assert_eq!(r, Nucleotide::Purine);
    /// ```
    pub fn ambiguity_for(symbols: &[Nucleotide]) -> Nucleotide {
        let mask = symbols
            .iter()
            .fold(0u8, |acc, n| acc | BASE_MASKS[*n as usize]);
        ALL.iter()
            .copied()
            .find(|n| BASE_MASKS[*n as usize] == mask)
            .unwrap_or(Nucleotide::Unknown)
    }
}

impl std::fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Parse text into symbols; ASCII whitespace is skipped
///
/// # Examples
/// ```
/// use fast_slicemap::core::dna::{parse_nucleotides, to_string};
///
/// let symbols = parse_nucleotides("AC-GT\nN").unwrap();
/// assert_eq!(to_string(&symbols), "AC-GTN");
/// assert!(parse_nucleotides("ACZ").is_err());
/// ```
pub fn parse_nucleotides(text: &str) -> SequenceResult<Vec<Nucleotide>> {
    text.chars()
        .filter(|c| !c.is_ascii_whitespace())
        .enumerate()
        .map(|(position, symbol)| {
            Nucleotide::from_char(symbol)
                .ok_or(SequenceError::InvalidSymbol { symbol, position })
        })
        .collect()
}

/// Reverse complement of a symbol slice
pub fn reverse_complement(symbols: &[Nucleotide]) -> Vec<Nucleotide> {
    symbols.iter().rev().map(|n| n.complement()).collect()
}

/// Render symbols as text
pub fn to_string(symbols: &[Nucleotide]) -> String {
    symbols.iter().map(|n| n.to_char()).collect()
}
