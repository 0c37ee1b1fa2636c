//! Read orientation relative to the reference

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, PartialOrd, Ord)]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl Strand {
    /// Get the opposite strand
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::Strand;
    /// assert_eq!(Strand::Forward.opposite(), Strand::Reverse);
    /// assert_eq!(Strand::Reverse.opposite(), Strand::Forward);
    /// ```
    pub fn opposite(&self) -> Self {
        match self {
            Strand::Forward => Strand::Reverse,
            Strand::Reverse => Strand::Forward,
        }
    }

    /// Parse strand from char
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::Strand;
    /// assert_eq!(Strand::from_char('+'), Some(Strand::Forward));
    /// assert_eq!(Strand::from_char('-'), Some(Strand::Reverse));
    /// assert_eq!(Strand::from_char('.'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' | 'F' | 'f' => Some(Strand::Forward),
            '-' | 'R' | 'r' => Some(Strand::Reverse),
            _ => None,
        }
    }

    /// Convert to char
    pub fn to_char(&self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }

    /// Single bit used when packing a strand next to a 4-bit nucleotide code
    #[inline]
    pub(crate) fn bit(&self) -> u8 {
        match self {
            Strand::Forward => 0,
            Strand::Reverse => 1,
        }
    }

    #[inline]
    pub(crate) fn from_bit(bit: u8) -> Self {
        if bit & 1 == 0 {
            Strand::Forward
        } else {
            Strand::Reverse
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
