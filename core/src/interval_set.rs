//! Sets of token types stored as sorted, disjoint, non-adjacent intervals.
//!
//! Grammars usually accept runs of consecutive token types (every keyword,
//! every character in a class), so a handful of closed intervals is far
//! smaller than a bitmap over the whole vocabulary.
//!
//! A set can be frozen with [`IntervalSet::freeze`]. Freezing is one-way:
//! every mutating method on a frozen set fails with
//! [`Error::FrozenSetMutation`].

use core::fmt;

use crate::Error;
use crate::token::{EOF, EPSILON, TokenType};

/// A closed interval `[start, stop]` of token types.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    /// First member (inclusive).
    pub start: TokenType,
    /// Last member (inclusive).
    pub stop: TokenType,
}

impl Interval {
    #[inline]
    pub const fn new(start: TokenType, stop: TokenType) -> Self {
        Self { start, stop }
    }

    /// Number of members. Inverted intervals are empty.
    #[inline]
    pub fn len(&self) -> usize {
        if self.stop < self.start {
            0
        } else {
            (i64::from(self.stop) - i64::from(self.start) + 1) as usize
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stop < self.start
    }

    #[inline]
    pub fn contains(&self, value: TokenType) -> bool {
        self.start <= value && value <= self.stop
    }
}

/// A set of token types.
///
/// Intervals are kept sorted, disjoint and non-adjacent after every
/// operation: adding `5` and then `6` to `{1..4}` yields `{1..6}`.
///
/// With the `serde` feature a set serializes as its list of intervals.
/// Deserializing merges that list back into normal form and always yields
/// a mutable set.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<Interval>", into = "Vec<Interval>")
)]
#[derive(Debug, Clone, Default)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
    read_only: bool,
}

impl IntervalSet {
    /// Creates an empty, mutable set.
    #[inline]
    pub const fn new() -> Self {
        Self {
            intervals: Vec::new(),
            read_only: false,
        }
    }

    /// Creates a set holding a single token type.
    #[inline]
    pub fn of(value: TokenType) -> Self {
        Self::of_range(value, value)
    }

    /// Creates a set holding every token type in `[start, stop]`.
    pub fn of_range(start: TokenType, stop: TokenType) -> Self {
        let mut set = Self::new();
        set.insert(Interval::new(start, stop));
        set
    }

    /// Creates a mutable copy of `other`, whether or not `other` is frozen.
    pub fn copy_of(other: &IntervalSet) -> Self {
        Self {
            intervals: other.intervals.clone(),
            read_only: false,
        }
    }

    /// Makes the set immutable. There is no way back.
    #[inline]
    pub fn freeze(&mut self) {
        self.read_only = true;
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// The underlying intervals, sorted and disjoint.
    #[inline]
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Returns true if the set has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Number of members (not intervals).
    pub fn len(&self) -> usize {
        self.intervals.iter().map(Interval::len).sum()
    }

    #[inline]
    pub fn min_element(&self) -> Option<TokenType> {
        self.intervals.first().map(|i| i.start)
    }

    #[inline]
    pub fn max_element(&self) -> Option<TokenType> {
        self.intervals.last().map(|i| i.stop)
    }

    /// Membership test, `O(log n)` in the number of intervals.
    pub fn contains(&self, value: TokenType) -> bool {
        let idx = self.intervals.partition_point(|i| i.stop < value);
        self.intervals
            .get(idx)
            .is_some_and(|interval| interval.start <= value)
    }

    /// Iterates over every member in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = TokenType> + '_ {
        self.intervals.iter().flat_map(|i| i.start..=i.stop)
    }

    /// Adds a single token type.
    pub fn add_one(&mut self, value: TokenType) -> Result<(), Error> {
        self.add_range(value, value)
    }

    /// Adds every token type in `[start, stop]`. An inverted range is a no-op.
    pub fn add_range(&mut self, start: TokenType, stop: TokenType) -> Result<(), Error> {
        self.ensure_mutable()?;
        self.insert(Interval::new(start, stop));
        Ok(())
    }

    /// Adds every member of `other`.
    pub fn add_set(&mut self, other: &IntervalSet) -> Result<(), Error> {
        self.ensure_mutable()?;
        self.insert_set(other);
        Ok(())
    }

    /// Removes a single token type, splitting the interval holding it if the
    /// value lies strictly inside.
    pub fn remove_one(&mut self, value: TokenType) -> Result<(), Error> {
        self.ensure_mutable()?;
        let idx = self.intervals.partition_point(|i| i.stop < value);
        let Some(interval) = self.intervals.get_mut(idx) else {
            return Ok(());
        };
        if value < interval.start {
            return Ok(());
        }

        if interval.start == interval.stop {
            self.intervals.remove(idx);
        } else if value == interval.start {
            interval.start += 1;
        } else if value == interval.stop {
            interval.stop -= 1;
        } else {
            let upper = Interval::new(value + 1, interval.stop);
            interval.stop = value - 1;
            self.intervals.insert(idx + 1, upper);
        }
        Ok(())
    }

    /// Returns a new mutable set holding the members of either set.
    pub fn union(&self, other: &IntervalSet) -> IntervalSet {
        let mut result = Self::copy_of(self);
        result.insert_set(other);
        result
    }

    /// Returns a new mutable set holding the members of `self` not in `other`.
    pub fn subtract(&self, other: &IntervalSet) -> IntervalSet {
        let mut result = Vec::with_capacity(self.intervals.len());
        let mut theirs = other.intervals.iter().peekable();

        for &mine in &self.intervals {
            let mut current = mine;
            while let Some(&&cut) = theirs.peek() {
                if cut.stop < current.start {
                    theirs.next();
                    continue;
                }
                if cut.start > current.stop {
                    break;
                }
                if cut.start > current.start {
                    result.push(Interval::new(current.start, cut.start - 1));
                }
                if cut.stop >= current.stop {
                    current = Interval::new(1, 0);
                    break;
                }
                current.start = cut.stop + 1;
                theirs.next();
            }
            if !current.is_empty() {
                result.push(current);
            }
        }

        IntervalSet {
            intervals: result,
            read_only: false,
        }
    }

    /// Returns the members of `[min, max]` that are not in this set.
    pub fn complement(&self, min: TokenType, max: TokenType) -> IntervalSet {
        IntervalSet::of_range(min, max).subtract(self)
    }

    /// Renders the set using token names from `vocabulary`, indexed by token
    /// type. Types without a name are rendered as numbers.
    pub fn to_token_string(&self, vocabulary: &[&str]) -> String {
        let names: Vec<String> = self
            .iter()
            .map(|t| match t {
                EOF => "<EOF>".to_string(),
                EPSILON => "<EPSILON>".to_string(),
                _ => usize::try_from(t)
                    .ok()
                    .and_then(|idx| vocabulary.get(idx))
                    .map_or_else(|| t.to_string(), |name| (*name).to_string()),
            })
            .collect();

        match names.len() {
            0 => "{}".to_string(),
            1 => names.join(""),
            _ => format!("{{{}}}", names.join(", ")),
        }
    }

    pub(crate) fn insert_set(&mut self, other: &IntervalSet) {
        for &interval in &other.intervals {
            self.insert(interval);
        }
    }

    /// Inserts `add`, merging with every overlapping or adjacent interval.
    pub(crate) fn insert(&mut self, add: Interval) {
        if add.is_empty() {
            return;
        }

        let lo = self
            .intervals
            .partition_point(|i| i.stop.saturating_add(1) < add.start);
        let mut hi = lo;
        let mut merged = add;
        while let Some(next) = self.intervals.get(hi) {
            if next.start > merged.stop.saturating_add(1) {
                break;
            }
            merged.start = merged.start.min(next.start);
            merged.stop = merged.stop.max(next.stop);
            hi += 1;
        }
        self.intervals.splice(lo..hi, core::iter::once(merged));
    }

    #[inline]
    fn ensure_mutable(&self) -> Result<(), Error> {
        if self.read_only {
            log::error!("attempted to modify frozen interval set {}", self);
            Err(Error::FrozenSetMutation)
        } else {
            Ok(())
        }
    }
}

/// Sets compare by membership; the frozen flag is ignored.
impl PartialEq for IntervalSet {
    fn eq(&self, other: &Self) -> bool {
        self.intervals == other.intervals
    }
}

impl Eq for IntervalSet {}

impl FromIterator<TokenType> for IntervalSet {
    fn from_iter<I: IntoIterator<Item = TokenType>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(Interval::new(value, value));
        }
        set
    }
}

impl From<Interval> for IntervalSet {
    fn from(interval: Interval) -> Self {
        let mut set = Self::new();
        set.insert(interval);
        set
    }
}

/// Builds a mutable set from intervals in any order, merging overlapping and
/// adjacent ones and dropping inverted ones.
impl From<Vec<Interval>> for IntervalSet {
    fn from(intervals: Vec<Interval>) -> Self {
        let mut set = Self::new();
        for interval in intervals {
            set.insert(interval);
        }
        set
    }
}

impl From<IntervalSet> for Vec<Interval> {
    fn from(set: IntervalSet) -> Self {
        set.intervals
    }
}

fn fmt_element(f: &mut fmt::Formatter<'_>, value: TokenType) -> fmt::Result {
    match value {
        EOF => f.write_str("<EOF>"),
        EPSILON => f.write_str("<EPSILON>"),
        _ => write!(f, "{value}"),
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{}");
        }
        let braces = self.len() > 1;
        if braces {
            f.write_str("{")?;
        }
        for (idx, interval) in self.intervals.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            fmt_element(f, interval.start)?;
            if interval.stop != interval.start {
                f.write_str("..")?;
                fmt_element(f, interval.stop)?;
            }
        }
        if braces {
            f.write_str("}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn assert_normalized(set: &IntervalSet) {
        for pair in set.intervals().windows(2) {
            assert!(
                pair[0].stop + 1 < pair[1].start,
                "intervals {:?} and {:?} overlap or touch",
                pair[0],
                pair[1]
            );
        }
        for interval in set.intervals() {
            assert!(interval.start <= interval.stop);
        }
    }

    #[test]
    fn test_adjacent_values_coalesce() {
        let mut set = IntervalSet::of_range(1, 4);
        set.add_one(5).unwrap();
        set.add_one(6).unwrap();
        assert_eq!(set.intervals(), &[Interval::new(1, 6)]);
    }

    #[test]
    fn test_add_bridges_gap() {
        let mut set = IntervalSet::from_iter([1, 2, 3, 7, 8]);
        assert_eq!(set.intervals().len(), 2);
        set.add_range(4, 6).unwrap();
        assert_eq!(set.intervals(), &[Interval::new(1, 8)]);
    }

    #[test]
    fn test_add_swallows_several_intervals() {
        let mut set = IntervalSet::from_iter([1, 3, 5, 7, 20]);
        set.add_range(2, 10).unwrap();
        assert_eq!(
            set.intervals(),
            &[Interval::new(1, 10), Interval::new(20, 20)]
        );
        assert_normalized(&set);
    }

    #[test]
    fn test_add_inverted_range_is_noop() {
        let mut set = IntervalSet::new();
        set.add_range(5, 1).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_add_at_extremes() {
        let mut set = IntervalSet::of(i32::MAX);
        set.add_one(i32::MAX - 1).unwrap();
        set.add_one(i32::MIN).unwrap();
        assert_eq!(
            set.intervals(),
            &[
                Interval::new(i32::MIN, i32::MIN),
                Interval::new(i32::MAX - 1, i32::MAX)
            ]
        );
    }

    #[test_case(1, &[(2, 5)]; "remove start")]
    #[test_case(5, &[(1, 4)]; "remove stop")]
    #[test_case(3, &[(1, 2), (4, 5)]; "split interior")]
    #[test_case(9, &[(1, 5)]; "remove absent")]
    fn test_remove_one(value: TokenType, expected: &[(TokenType, TokenType)]) {
        let mut set = IntervalSet::of_range(1, 5);
        set.remove_one(value).unwrap();
        let expected: Vec<Interval> = expected
            .iter()
            .map(|&(start, stop)| Interval::new(start, stop))
            .collect();
        assert_eq!(set.intervals(), expected.as_slice());
    }

    #[test]
    fn test_remove_singleton_interval() {
        let mut set = IntervalSet::from_iter([1, 5, 9]);
        set.remove_one(5).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 9]);
    }

    #[test]
    fn test_remove_epsilon_next_to_eof() {
        let mut set = IntervalSet::from_iter([EOF, EPSILON, 1, 2]);
        assert_eq!(set.intervals(), &[Interval::new(EOF, 2)]);
        set.remove_one(EPSILON).unwrap();
        assert_eq!(
            set.intervals(),
            &[Interval::new(EOF, EOF), Interval::new(1, 2)]
        );
    }

    #[test]
    fn test_contains() {
        let set = IntervalSet::from_iter([1, 2, 3, 10, 12]);
        for v in [1, 2, 3, 10, 12] {
            assert!(set.contains(v), "{v} should be a member");
        }
        for v in [0, 4, 9, 11, 13, -1] {
            assert!(!set.contains(v), "{v} should not be a member");
        }
    }

    #[test]
    fn test_frozen_set_rejects_mutation() {
        let mut set = IntervalSet::of(3);
        set.freeze();
        assert!(set.is_read_only());
        assert_eq!(set.add_one(4), Err(Error::FrozenSetMutation));
        assert_eq!(set.add_range(4, 8), Err(Error::FrozenSetMutation));
        assert_eq!(
            set.add_set(&IntervalSet::of(9)),
            Err(Error::FrozenSetMutation)
        );
        assert_eq!(set.remove_one(3), Err(Error::FrozenSetMutation));
        assert_eq!(set, IntervalSet::of(3));
    }

    #[test]
    fn test_copy_of_frozen_is_mutable() {
        let mut frozen = IntervalSet::of(3);
        frozen.freeze();
        let mut copy = IntervalSet::copy_of(&frozen);
        assert!(!copy.is_read_only());
        copy.add_one(4).unwrap();
        assert_eq!(copy, IntervalSet::of_range(3, 4));
    }

    #[test]
    fn test_equality_ignores_frozen_flag() {
        let mut a = IntervalSet::of_range(1, 3);
        let b = IntervalSet::of_range(1, 3);
        a.freeze();
        assert_eq!(a, b);
    }

    #[test]
    fn test_subtract() {
        let a = IntervalSet::of_range(1, 20);
        let b = IntervalSet::from_iter([0, 5, 6, 7, 15, 20, 25]);
        let diff = a.subtract(&b);
        assert_eq!(
            diff.intervals(),
            &[
                Interval::new(1, 4),
                Interval::new(8, 14),
                Interval::new(16, 19)
            ]
        );
    }

    #[test]
    fn test_subtract_everything() {
        let a = IntervalSet::from_iter([1, 2, 5]);
        let b = IntervalSet::of_range(0, 10);
        assert!(a.subtract(&b).is_empty());
    }

    #[test]
    fn test_complement() {
        let set = IntervalSet::from_iter([2, 3, 6]);
        let complement = set.complement(1, 7);
        assert_eq!(complement.iter().collect::<Vec<_>>(), vec![1, 4, 5, 7]);
    }

    #[test]
    fn test_union_leaves_operands_untouched() {
        let a = IntervalSet::of_range(1, 3);
        let b = IntervalSet::of_range(4, 6);
        let u = a.union(&b);
        assert_eq!(u, IntervalSet::of_range(1, 6));
        assert_eq!(a, IntervalSet::of_range(1, 3));
    }

    #[test]
    fn test_len_and_bounds() {
        let set = IntervalSet::from_iter([EOF, 3, 4, 5, 9]);
        assert_eq!(set.len(), 5);
        assert_eq!(set.min_element(), Some(EOF));
        assert_eq!(set.max_element(), Some(9));
        assert_eq!(IntervalSet::new().min_element(), None);
    }

    #[test_case(IntervalSet::new(), "{}"; "empty")]
    #[test_case(IntervalSet::of(4), "4"; "single")]
    #[test_case(IntervalSet::of_range(1, 3), "{1..3}"; "range")]
    #[test_case(IntervalSet::from_iter([EOF, 7]), "{<EOF>, 7}"; "eof")]
    #[test_case(IntervalSet::of(EPSILON), "<EPSILON>"; "epsilon")]
    fn test_display(set: IntervalSet, expected: &str) {
        assert_eq!(set.to_string(), expected);
    }

    #[test]
    fn test_to_token_string() {
        let vocabulary = ["<INVALID>", "ID", "INT"];
        let set = IntervalSet::from_iter([EOF, 1, 2, 9]);
        assert_eq!(set.to_token_string(&vocabulary), "{<EOF>, ID, INT, 9}");
        assert_eq!(IntervalSet::of(1).to_token_string(&vocabulary), "ID");
    }

    #[test]
    fn test_interleaved_operations_stay_normalized() {
        let mut set = IntervalSet::new();
        let mut model = std::collections::BTreeSet::new();
        // Deterministic pseudo-random sequence.
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let value = (seed % 40) as TokenType - 2;
            match seed % 3 {
                0 => {
                    set.remove_one(value).unwrap();
                    model.remove(&value);
                }
                1 => {
                    let stop = value + (seed % 4) as TokenType;
                    set.add_range(value, stop).unwrap();
                    model.extend(value..=stop);
                }
                _ => {
                    set.add_one(value).unwrap();
                    model.insert(value);
                }
            }
            assert_normalized(&set);
        }
        assert_eq!(set.iter().collect::<Vec<_>>(), model.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_from_unsorted_intervals() {
        let set = IntervalSet::from(vec![
            Interval::new(5, 9),
            Interval::new(1, 6),
            Interval::new(12, 11),
            Interval::new(10, 10),
            Interval::new(-1, -1),
        ]);
        assert_normalized(&set);
        assert_eq!(set.intervals(), &[Interval::new(-1, -1), Interval::new(1, 10)]);
        assert!(set.contains(2));
        assert_eq!(set.len(), 11);
        assert!(!set.is_read_only());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_normalizes_input() {
        let set: IntervalSet =
            serde_json::from_str(r#"[{"start":5,"stop":9},{"start":1,"stop":6}]"#).unwrap();
        assert_normalized(&set);
        assert!(set.contains(2));
        assert_eq!(set.len(), 9);
        assert_eq!(set, IntervalSet::of_range(1, 9));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip_drops_frozen_flag() {
        let mut set = IntervalSet::from_iter([-1, 1, 2, 3, 7]);
        set.freeze();

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(
            json,
            r#"[{"start":-1,"stop":-1},{"start":1,"stop":3},{"start":7,"stop":7}]"#
        );

        let back: IntervalSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
        assert!(!back.is_read_only());
    }
}
