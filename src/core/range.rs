//! Closed interval algebra
//!
//! A [`Range`] is an inclusive interval `[begin, end]` stored on a zero-based axis.
//! `end == begin - 1` is the empty range at `begin`. The [`CoordinateSystem`] tag only
//! affects how endpoints are displayed or read in; the stored values never change.
//!
//! # Coordinate systems
//!
//! | System        | begin          | end            |
//! |---------------|----------------|----------------|
//! | zero-based    | `begin`        | `end`          |
//! | residue-based | `begin + 1`    | `end + 1`      |
//! | space-based   | `begin`        | `end + 1`      |

use crate::core::error::{RangeError, RangeResult};
use crate::core::Strand;
use memchr::{memchr, memmem};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// How range endpoints are presented to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoordinateSystem {
    /// 0-based inclusive endpoints
    #[default]
    ZeroBased,
    /// 1-based inclusive endpoints
    ResidueBased,
    /// Positions between residues: begin is the gap before the first residue,
    /// end is the gap after the last
    SpaceBased,
}

impl CoordinateSystem {
    /// Parse from string (for CLI argument)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "0b" | "zero" | "zero-based" | "zb" => Some(CoordinateSystem::ZeroBased),
            "rb" | "residue" | "residue-based" | "1b" => Some(CoordinateSystem::ResidueBased),
            "sb" | "space" | "space-based" => Some(CoordinateSystem::SpaceBased),
            _ => None,
        }
    }

    /// Short suffix used when displaying a range
    pub fn abbreviation(&self) -> &'static str {
        match self {
            CoordinateSystem::ZeroBased => "0B",
            CoordinateSystem::ResidueBased => "RB",
            CoordinateSystem::SpaceBased => "SB",
        }
    }

    #[inline]
    fn begin_shift(&self) -> i64 {
        match self {
            CoordinateSystem::ZeroBased | CoordinateSystem::SpaceBased => 0,
            CoordinateSystem::ResidueBased => 1,
        }
    }

    #[inline]
    fn end_shift(&self) -> i64 {
        match self {
            CoordinateSystem::ZeroBased => 0,
            CoordinateSystem::ResidueBased | CoordinateSystem::SpaceBased => 1,
        }
    }

    /// Convert a begin coordinate in this system to zero-based
    #[inline]
    pub fn to_zero_based_begin(&self, begin: i64) -> i64 {
        begin - self.begin_shift()
    }

    /// Convert an end coordinate in this system to zero-based
    #[inline]
    pub fn to_zero_based_end(&self, end: i64) -> i64 {
        end - self.end_shift()
    }

    /// Convert a zero-based begin coordinate into this system
    #[inline]
    pub fn from_zero_based_begin(&self, begin: i64) -> i64 {
        begin + self.begin_shift()
    }

    /// Convert a zero-based end coordinate into this system
    #[inline]
    pub fn from_zero_based_end(&self, end: i64) -> i64 {
        end + self.end_shift()
    }
}

/// Immutable closed interval on a zero-based axis
///
/// Equality, ordering and hashing only look at the endpoints; the coordinate system
/// tag is presentation.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    begin: i64,
    end: i64,
    system: CoordinateSystem,
}

impl PartialEq for Range {
    fn eq(&self, other: &Self) -> bool {
        self.begin == other.begin && self.end == other.end
    }
}

impl Eq for Range {}

impl Hash for Range {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.begin.hash(state);
        self.end.hash(state);
    }
}

impl PartialOrd for Range {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Range {
    fn cmp(&self, other: &Self) -> Ordering {
        self.begin
            .cmp(&other.begin)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl Range {
    /// Create a zero-based range
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::Range;
    ///
    /// let r = Range::new(10, 19).unwrap();
    /// assert_eq!(r.len(), 10);
    /// assert!(Range::new(5, 4).unwrap().is_empty());
    /// assert!(Range::new(5, 3).is_err());
    /// ```
    pub fn new(begin: i64, end: i64) -> RangeResult<Self> {
        Self::validated(begin, end, CoordinateSystem::ZeroBased)
    }

    /// Create a range from endpoints expressed in `system`
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::{CoordinateSystem, Range};
    ///
    /// let residue = Range::of(CoordinateSystem::ResidueBased, 1, 5).unwrap();
    /// assert_eq!(residue, Range::new(0, 4).unwrap());
    /// let space = Range::of(CoordinateSystem::SpaceBased, 0, 5).unwrap();
    /// assert_eq!(space, Range::new(0, 4).unwrap());
    /// ```
    pub fn of(system: CoordinateSystem, begin: i64, end: i64) -> RangeResult<Self> {
        Self::validated(
            system.to_zero_based_begin(begin),
            system.to_zero_based_end(end),
            system,
        )
    }

    fn validated(begin: i64, end: i64, system: CoordinateSystem) -> RangeResult<Self> {
        if end < begin.saturating_sub(1) {
            return Err(RangeError::InvalidRange { start: begin, end });
        }
        Ok(Self { begin, end, system })
    }

    /// `[0, len - 1]`
    pub fn of_length(len: u64) -> Self {
        Self {
            begin: 0,
            end: len as i64 - 1,
            system: CoordinateSystem::ZeroBased,
        }
    }

    /// Single position range `[position, position]`
    pub fn at(position: i64) -> Self {
        Self {
            begin: position,
            end: position,
            system: CoordinateSystem::ZeroBased,
        }
    }

    /// Empty range anchored at `begin`
    pub fn empty_at(begin: i64) -> Self {
        Self {
            begin,
            end: begin - 1,
            system: CoordinateSystem::ZeroBased,
        }
    }

    /// Smallest range containing both `a` and `b`
    pub fn bounding(a: &Range, b: &Range) -> Self {
        Self {
            begin: a.begin.min(b.begin),
            end: a.end.max(b.end),
            system: a.system,
        }
    }

    /// Zero-based begin
    #[inline]
    pub fn begin(&self) -> i64 {
        self.begin
    }

    /// Zero-based inclusive end
    #[inline]
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Begin expressed in `system`
    #[inline]
    pub fn begin_in(&self, system: CoordinateSystem) -> i64 {
        system.from_zero_based_begin(self.begin)
    }

    /// End expressed in `system`
    #[inline]
    pub fn end_in(&self, system: CoordinateSystem) -> i64 {
        system.from_zero_based_end(self.end)
    }

    /// Display coordinate system tag
    pub fn system(&self) -> CoordinateSystem {
        self.system
    }

    /// Same endpoints, displayed in another coordinate system
    pub fn with_system(mut self, system: CoordinateSystem) -> Self {
        self.system = system;
        self
    }

    /// Number of positions covered
    #[inline]
    pub fn len(&self) -> u64 {
        (self.end - self.begin + 1) as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end < self.begin
    }

    /// Whether `position` lies within the range
    #[inline]
    pub fn contains(&self, position: i64) -> bool {
        position >= self.begin && position <= self.end
    }

    /// Move both endpoints by `offset`
    pub fn shift(&self, offset: i64) -> Self {
        Self {
            begin: self.begin + offset,
            end: self.end + offset,
            system: self.system,
        }
    }

    /// Extend the range by `left` positions before and `right` positions after.
    /// Negative amounts shrink it.
    pub fn grow(&self, left: i64, right: i64) -> RangeResult<Self> {
        Self::validated(self.begin - left, self.end + right, self.system)
    }

    /// Remove `left` positions from the start and `right` from the end
    pub fn shrink(&self, left: i64, right: i64) -> RangeResult<Self> {
        self.grow(-left, -right)
    }

    /// Whether the two ranges share at least one position
    pub fn intersects(&self, other: &Range) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.begin <= other.end
            && other.begin <= self.end
    }

    /// Positions shared by both ranges; disjoint ranges give an empty range
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::Range;
    ///
    /// let a = Range::new(0, 99).unwrap();
    /// let b = Range::new(50, 149).unwrap();
    /// assert_eq!(a.intersection(&b), Range::new(50, 99).unwrap());
    /// assert!(a.intersection(&Range::new(200, 300).unwrap()).is_empty());
    /// ```
    pub fn intersection(&self, other: &Range) -> Self {
        if !self.intersects(other) {
            return Self::empty_at(self.begin).with_system(self.system);
        }
        Self {
            begin: self.begin.max(other.begin),
            end: self.end.min(other.end),
            system: self.system,
        }
    }

    /// Union as one range when the inputs intersect, otherwise both ranges ordered
    /// by start
    pub fn union(&self, other: &Range) -> Vec<Range> {
        if self == other {
            return vec![*self];
        }
        match (self.is_empty(), other.is_empty()) {
            (true, true) => return Vec::new(),
            (true, false) => return vec![*other],
            (false, true) => return vec![*self],
            (false, false) => {}
        }
        if self.intersects(other) {
            return vec![Self::bounding(self, other)];
        }
        let mut both = vec![*self, *other];
        both.sort();
        both
    }

    /// Parts of this range not covered by `other`
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::Range;
    ///
    /// let a = Range::new(0, 9).unwrap();
    /// let hole = Range::new(3, 5).unwrap();
    /// assert_eq!(
    ///     a.complement(&hole),
    ///     vec![Range::new(0, 2).unwrap(), Range::new(6, 9).unwrap()]
    /// );
    /// ```
    pub fn complement(&self, other: &Range) -> Vec<Range> {
        if self.is_empty() {
            return Vec::new();
        }
        if !self.intersects(other) {
            return vec![*self];
        }
        let mut pieces = Vec::with_capacity(2);
        if self.begin < other.begin {
            pieces.push(Self {
                begin: self.begin,
                end: other.begin - 1,
                system: self.system,
            });
        }
        if other.end < self.end {
            pieces.push(Self {
                begin: other.end + 1,
                end: self.end,
                system: self.system,
            });
        }
        pieces
    }

    /// Parts of this range covered by none of `others`
    pub fn complement_all<'a, I>(&self, others: I) -> Vec<Range>
    where
        I: IntoIterator<Item = &'a Range>,
    {
        let mut remaining = if self.is_empty() { Vec::new() } else { vec![*self] };
        for hole in Self::merge_overlapping(others.into_iter().copied()) {
            remaining = remaining
                .iter()
                .flat_map(|piece| piece.complement(&hole))
                .collect();
            if remaining.is_empty() {
                break;
            }
        }
        remaining
    }

    /// Non-strict containment: every endpoint combination where this range stays
    /// within `other` (equal begin, equal end, or strictly inside) is a sub-range
    pub fn is_sub_range_of(&self, other: &Range) -> bool {
        self.begin >= other.begin && self.end <= other.end
    }

    /// Begins before `other` begins
    pub fn starts_before(&self, other: &Range) -> bool {
        self.begin < other.begin
    }

    /// Ends before `other` begins
    pub fn ends_before(&self, other: &Range) -> bool {
        self.end < other.begin
    }

    /// Ends after `other` ends
    pub fn ends_after(&self, other: &Range) -> bool {
        self.end > other.end
    }

    /// Split into consecutive pieces of at most `max_len` positions
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::Range;
    ///
    /// let pieces = Range::new(0, 9).unwrap().split(4).unwrap();
    /// assert_eq!(pieces.len(), 3);
    /// assert_eq!(pieces[2], Range::new(8, 9).unwrap());
    /// ```
    pub fn split(&self, max_len: u64) -> RangeResult<Vec<Range>> {
        if max_len == 0 {
            return Err(RangeError::InvalidSplitLength);
        }
        let step = i64::try_from(max_len).unwrap_or(i64::MAX);
        let mut pieces = Vec::with_capacity((self.len() / max_len + 1) as usize);
        let mut begin = self.begin;
        while begin <= self.end {
            let end = begin.saturating_add(step - 1).min(self.end);
            pieces.push(Self {
                begin,
                end,
                system: self.system,
            });
            begin = end + 1;
        }
        Ok(pieces)
    }

    /// Merge ranges that overlap or touch
    pub fn merge_overlapping<I: IntoIterator<Item = Range>>(ranges: I) -> Vec<Range> {
        Self::merge(ranges, 0)
    }

    /// Merge ranges separated by at most `max_gap` uncovered positions
    ///
    /// Empty ranges are discarded. The result is sorted and stable under a second
    /// merge with the same gap.
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::Range;
    ///
    /// let ranges = vec![
    ///     Range::new(0, 4).unwrap(),
    ///     Range::new(5, 9).unwrap(),
    ///     Range::new(12, 15).unwrap(),
    /// ];
    /// assert_eq!(Range::merge(ranges.clone(), 0).len(), 2);
    /// assert_eq!(Range::merge(ranges, 2), vec![Range::new(0, 15).unwrap()]);
    /// ```
    pub fn merge<I: IntoIterator<Item = Range>>(ranges: I, max_gap: u64) -> Vec<Range> {
        let mut sorted: Vec<Range> = ranges.into_iter().filter(|r| !r.is_empty()).collect();
        sorted.sort();

        loop {
            let mut merged = Vec::with_capacity(sorted.len());
            let mut changed = false;
            let mut iter = sorted.into_iter();
            let Some(mut current) = iter.next() else {
                return Vec::new();
            };
            for next in iter {
                let bounding = Self::bounding(&current, &next);
                if bounding.len() <= current.len() + next.len() + max_gap {
                    current = bounding;
                    changed = true;
                } else {
                    merged.push(current);
                    current = next;
                }
            }
            merged.push(current);
            if !changed {
                return merged;
            }
            sorted = merged;
        }
    }

    /// Iterate over every covered position
    pub fn positions(&self) -> impl Iterator<Item = i64> {
        self.begin..=self.end
    }

    /// Parse text written in `system`
    pub fn parse_in(text: &str, system: CoordinateSystem) -> RangeResult<Self> {
        let (begin, end) = parse_endpoints(text)?;
        Self::of(system, begin, end)
    }

    /// Render endpoints in `system`, e.g. `[1 .. 5]/RB`
    pub fn to_string_in(&self, system: CoordinateSystem) -> String {
        format!(
            "[{} .. {}]/{}",
            self.begin_in(system),
            self.end_in(system),
            system.abbreviation()
        )
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string_in(self.system))
    }
}

impl FromStr for Range {
    type Err = RangeError;

    /// Accepts `a..b`, `a-b`, `a,b`, optionally bracketed and optionally followed by
    /// a `/0B`, `/RB` or `/SB` coordinate system suffix (zero-based by default).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(slash) = trimmed.rfind('/') {
            if let Some(system) = CoordinateSystem::from_str(trimmed[slash + 1..].trim()) {
                return Self::parse_in(&trimmed[..slash], system);
            }
        }
        Self::parse_in(trimmed, CoordinateSystem::ZeroBased)
    }
}

/// Split range text into its two endpoint values, in written order
pub(crate) fn parse_endpoints(text: &str) -> RangeResult<(i64, i64)> {
    let unparseable = || RangeError::Unparseable(text.to_string());
    let body = text
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();
    let bytes = body.as_bytes();

    let (left, right) = if let Some(pos) = memmem::find(bytes, b"..") {
        (&body[..pos], &body[pos + 2..])
    } else if let Some(pos) = memchr(b',', bytes) {
        (&body[..pos], &body[pos + 1..])
    } else if let Some(pos) = bytes.get(1..).and_then(|rest| memchr(b'-', rest)) {
        // Skip a leading minus sign on the first endpoint
        (&body[..pos + 1], &body[pos + 2..])
    } else {
        return Err(unparseable());
    };

    let begin = left.trim().parse::<i64>().map_err(|_| unparseable())?;
    let end = right.trim().parse::<i64>().map_err(|_| unparseable())?;
    Ok((begin, end))
}

/// A range paired with the strand it was read on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectedRange {
    range: Range,
    strand: Strand,
}

impl DirectedRange {
    pub fn new(range: Range, strand: Strand) -> Self {
        Self { range, strand }
    }

    /// Parse `a..b` style text; a first endpoint larger than the second means the
    /// range was written on the reverse strand
    ///
    /// # Examples
    /// ```
    /// use fast_slicemap::core::{CoordinateSystem, DirectedRange, Range, Strand};
    ///
    /// let d = DirectedRange::parse("20..11", CoordinateSystem::ResidueBased).unwrap();
    /// assert_eq!(d.strand(), Strand::Reverse);
    /// assert_eq!(d.range(), Range::new(10, 19).unwrap());
    /// ```
    pub fn parse(text: &str, system: CoordinateSystem) -> RangeResult<Self> {
        let (first, second) = parse_endpoints(text)?;
        if first <= second {
            Ok(Self::new(Range::of(system, first, second)?, Strand::Forward))
        } else {
            Ok(Self::new(Range::of(system, second, first)?, Strand::Reverse))
        }
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }
}

impl std::fmt::Display for DirectedRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.range, self.strand)
    }
}

/// Provisional, mutable endpoints that become a validated [`Range`] on `build`
#[derive(Debug, Clone)]
pub struct RangeBuilder {
    begin: i64,
    end: i64,
    system: CoordinateSystem,
}

impl RangeBuilder {
    /// Start from zero-based endpoints; nothing is checked until `build`
    pub fn new(begin: i64, end: i64) -> Self {
        Self {
            begin,
            end,
            system: CoordinateSystem::ZeroBased,
        }
    }

    /// `[0, len - 1]`
    pub fn of_length(len: u64) -> Self {
        Self::new(0, len as i64 - 1)
    }

    pub fn from_range(range: &Range) -> Self {
        Self {
            begin: range.begin,
            end: range.end,
            system: range.system,
        }
    }

    pub fn shift(&mut self, offset: i64) -> &mut Self {
        self.begin += offset;
        self.end += offset;
        self
    }

    pub fn expand_begin(&mut self, amount: i64) -> &mut Self {
        self.begin -= amount;
        self
    }

    pub fn expand_end(&mut self, amount: i64) -> &mut Self {
        self.end += amount;
        self
    }

    pub fn contract_begin(&mut self, amount: i64) -> &mut Self {
        self.begin += amount;
        self
    }

    pub fn contract_end(&mut self, amount: i64) -> &mut Self {
        self.end -= amount;
        self
    }

    pub fn set_begin(&mut self, begin: i64) -> &mut Self {
        self.begin = begin;
        self
    }

    pub fn set_end(&mut self, end: i64) -> &mut Self {
        self.end = end;
        self
    }

    /// Coordinate system tag carried by the built range
    pub fn system(&mut self, system: CoordinateSystem) -> &mut Self {
        self.system = system;
        self
    }

    pub fn build(&self) -> RangeResult<Range> {
        Range::validated(self.begin, self.end, self.system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(begin: i64, end: i64) -> Range {
        Range::new(begin, end).unwrap()
    }

    #[test]
    fn test_invalid_range_rejected() {
        assert_eq!(
            Range::new(10, 8),
            Err(RangeError::InvalidRange { start: 10, end: 8 })
        );
        assert!(Range::new(10, 9).unwrap().is_empty());
        assert_eq!(Range::new(10, 9).unwrap().len(), 0);
    }

    #[test]
    fn test_coordinate_conversion() {
        let range = r(0, 4);
        assert_eq!(range.begin_in(CoordinateSystem::ResidueBased), 1);
        assert_eq!(range.end_in(CoordinateSystem::ResidueBased), 5);
        assert_eq!(range.begin_in(CoordinateSystem::SpaceBased), 0);
        assert_eq!(range.end_in(CoordinateSystem::SpaceBased), 5);

        let empty = Range::empty_at(3);
        assert_eq!(empty.begin_in(CoordinateSystem::SpaceBased), 3);
        assert_eq!(empty.end_in(CoordinateSystem::SpaceBased), 3);
    }

    #[test]
    fn test_intersection() {
        assert_eq!(r(0, 99).intersection(&r(50, 149)), r(50, 99));
        assert_eq!(r(25, 75).intersection(&r(0, 100)), r(25, 75));
        assert_eq!(r(0, 100).intersection(&r(0, 100)), r(0, 100));
        // Adjacent ranges share no position
        assert!(r(0, 49).intersection(&r(50, 99)).is_empty());
        assert!(!r(0, 49).intersects(&r(50, 99)));
    }

    #[test]
    fn test_union() {
        assert_eq!(r(0, 10).union(&r(5, 20)), vec![r(0, 20)]);
        assert_eq!(r(30, 40).union(&r(0, 10)), vec![r(0, 10), r(30, 40)]);
        assert_eq!(r(0, 10).union(&Range::empty_at(50)), vec![r(0, 10)]);
        assert_eq!(Range::empty_at(4).union(&Range::empty_at(4)), vec![Range::empty_at(4)]);
    }

    #[test]
    fn test_complement() {
        assert_eq!(r(0, 9).complement(&r(3, 5)), vec![r(0, 2), r(6, 9)]);
        assert_eq!(r(0, 9).complement(&r(0, 5)), vec![r(6, 9)]);
        assert_eq!(r(0, 9).complement(&r(5, 20)), vec![r(0, 4)]);
        assert!(r(0, 9).complement(&r(-5, 20)).is_empty());
        assert_eq!(r(0, 9).complement(&r(20, 30)), vec![r(0, 9)]);
    }

    #[test]
    fn test_complement_all() {
        let holes = [r(2, 3), r(6, 6), r(3, 4)];
        assert_eq!(r(0, 9).complement_all(&holes), vec![r(0, 1), r(5, 5), r(7, 9)]);
    }

    #[test]
    fn test_is_sub_range_of_boundaries() {
        let outer = r(10, 20);
        // equal begin, equal end
        assert!(r(10, 20).is_sub_range_of(&outer));
        // equal begin, inner end
        assert!(r(10, 15).is_sub_range_of(&outer));
        // inner begin, equal end
        assert!(r(15, 20).is_sub_range_of(&outer));
        // inner begin, inner end
        assert!(r(12, 18).is_sub_range_of(&outer));
        // either endpoint outside
        assert!(!r(9, 20).is_sub_range_of(&outer));
        assert!(!r(10, 21).is_sub_range_of(&outer));
    }

    #[test]
    fn test_merge_max_gap() {
        let ranges = vec![r(0, 4), r(6, 9)];
        assert_eq!(Range::merge(ranges.clone(), 0), ranges);
        assert_eq!(Range::merge(ranges, 1), vec![r(0, 9)]);
        assert_eq!(Range::merge_overlapping(vec![r(0, 4), r(5, 9)]), vec![r(0, 9)]);
        assert_eq!(
            Range::merge_overlapping(vec![r(0, 20), r(3, 4), r(30, 31)]),
            vec![r(0, 20), r(30, 31)]
        );
        assert!(Range::merge(Vec::new(), 3).is_empty());
    }

    #[test]
    fn test_split() {
        let pieces = r(0, 9).split(3).unwrap();
        assert_eq!(pieces, vec![r(0, 2), r(3, 5), r(6, 8), r(9, 9)]);
        assert!(Range::empty_at(0).split(3).unwrap().is_empty());
        assert_eq!(r(0, 9).split(0), Err(RangeError::InvalidSplitLength));
    }

    #[test]
    fn test_grow_shrink() {
        assert_eq!(r(5, 10).grow(2, 3).unwrap(), r(3, 13));
        assert_eq!(r(5, 10).shrink(2, 3).unwrap(), r(7, 7));
        assert!(r(5, 10).shrink(4, 4).is_err());
        assert_eq!(r(5, 10).shift(-5), r(0, 5));
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("1..5".parse::<Range>().unwrap(), r(1, 5));
        assert_eq!("1 - 5".parse::<Range>().unwrap(), r(1, 5));
        assert_eq!("[1, 5]".parse::<Range>().unwrap(), r(1, 5));
        assert_eq!("-5--2".parse::<Range>().unwrap(), r(-5, -2));
        assert_eq!("[1 .. 5]/RB".parse::<Range>().unwrap(), r(0, 4));
        assert_eq!("[0 .. 5]/SB".parse::<Range>().unwrap(), r(0, 4));
        assert!("banana".parse::<Range>().is_err());
        assert!("5..1".parse::<Range>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let range = r(0, 4).with_system(CoordinateSystem::ResidueBased);
        let text = range.to_string();
        assert_eq!(text, "[1 .. 5]/RB");
        assert_eq!(text.parse::<Range>().unwrap(), range);
    }

    #[test]
    fn test_directed_range() {
        let forward = DirectedRange::parse("10..20", CoordinateSystem::ZeroBased).unwrap();
        assert_eq!(forward.strand(), Strand::Forward);
        assert_eq!(forward.range(), r(10, 20));

        let reverse = DirectedRange::parse("20-10", CoordinateSystem::ZeroBased).unwrap();
        assert_eq!(reverse.strand(), Strand::Reverse);
        assert_eq!(reverse.range(), r(10, 20));
    }

    #[test]
    fn test_builder() {
        let mut builder = RangeBuilder::of_length(10);
        builder.shift(5).expand_begin(2).contract_end(3);
        assert_eq!(builder.build().unwrap(), r(3, 11));

        builder.set_end(0);
        assert!(builder.build().is_err());
    }
}
