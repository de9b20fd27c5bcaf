//! Pair → count tables with increment-or-insert and key-wise merge.

use std::collections::hash_map;
use std::collections::HashMap;

use crate::record::{canonical, FilePair, PairKey};

/// Co-change counts keyed by canonical [`FilePair`].
///
/// # Examples
///
/// ```
/// use cochange_coupling::CouplingTable;
///
/// let mut table = CouplingTable::new();
/// table.record("b.js", "a.js");
/// table.record("a.js", "b.js");
/// table.record("a.js", "a.js");
///
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.get("a.js", "b.js"), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouplingTable {
    counts: HashMap<FilePair, u64>,
}

impl CouplingTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one co-change for `pair`, inserting it at zero if absent.
    pub fn increment(&mut self, pair: FilePair) {
        self.add(pair, 1);
    }

    /// Add `count` co-changes for `pair`.
    pub fn add(&mut self, pair: FilePair, count: u64) {
        *self.counts.entry(pair).or_default() += count;
    }

    /// Canonicalize `a`/`b` and increment. Returns `false` for a self-pair,
    /// which is never counted.
    ///
    /// Existing keys are bumped in place; a `FilePair` is only allocated
    /// the first time a pair is seen.
    pub fn record(&mut self, a: &str, b: &str) -> bool {
        let Some(key) = canonical(a, b) else {
            return false;
        };
        match self.counts.get_mut(&key as &dyn PairKey) {
            Some(count) => *count += 1,
            None => {
                let (first, second) = key;
                if let Some(pair) = FilePair::new(first, second) {
                    self.counts.insert(pair, 1);
                }
            }
        }
        true
    }

    /// Count for the pair `a`/`b` in either order; zero when absent.
    pub fn get(&self, a: &str, b: &str) -> u64 {
        canonical(a, b)
            .and_then(|key| self.counts.get(&key as &dyn PairKey).copied())
            .unwrap_or(0)
    }

    /// Count for an already canonical pair.
    pub fn count(&self, pair: &FilePair) -> u64 {
        self.counts.get(pair).copied().unwrap_or(0)
    }

    /// Number of distinct pairs.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate pairs and counts in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, FilePair, u64> {
        self.counts.iter()
    }

    /// Fold `other` into `self` by key-wise summation.
    pub fn merge(&mut self, other: CouplingTable) {
        for (pair, count) in other.counts {
            self.add(pair, count);
        }
    }

    /// Merge two tables, reusing the larger one's allocation.
    pub fn merged(self, other: CouplingTable) -> CouplingTable {
        let (mut big, small) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        big.merge(small);
        big
    }
}

impl IntoIterator for CouplingTable {
    type Item = (FilePair, u64);
    type IntoIter = hash_map::IntoIter<FilePair, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

impl<'a> IntoIterator for &'a CouplingTable {
    type Item = (&'a FilePair, &'a u64);
    type IntoIter = hash_map::Iter<'a, FilePair, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

impl FromIterator<(FilePair, u64)> for CouplingTable {
    fn from_iter<T: IntoIterator<Item = (FilePair, u64)>>(iter: T) -> Self {
        let mut table = CouplingTable::new();
        for (pair, count) in iter {
            table.add(pair, count);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_skips_self_pairs() {
        let mut table = CouplingTable::new();
        assert!(!table.record("a.js", "a.js"));
        assert!(table.is_empty());
    }

    #[test]
    fn get_is_symmetric() {
        let mut table = CouplingTable::new();
        table.record("x.js", "y.js");
        assert_eq!(table.get("x.js", "y.js"), 1);
        assert_eq!(table.get("y.js", "x.js"), 1);
        assert_eq!(table.get("x.js", "z.js"), 0);
    }

    #[test]
    fn merge_sums_overlapping_keys() {
        let mut left = CouplingTable::new();
        left.record("a", "b");
        left.record("a", "c");

        let mut right = CouplingTable::new();
        right.record("b", "a");
        right.record("c", "d");

        left.merge(right);
        assert_eq!(left.get("a", "b"), 2);
        assert_eq!(left.get("a", "c"), 1);
        assert_eq!(left.get("c", "d"), 1);
        assert_eq!(left.len(), 3);
    }

    #[test]
    fn repeated_records_bump_one_key() {
        let mut table = CouplingTable::new();
        for _ in 0..3 {
            assert!(table.record("lib/b.js", "lib/a.js"));
            assert!(table.record("lib/a.js", "lib/b.js"));
        }
        assert_eq!(table.len(), 1);
        let pair = FilePair::new("lib/a.js", "lib/b.js").unwrap();
        assert_eq!(table.count(&pair), 6);
        assert_eq!(table.get("lib/b.js", "lib/a.js"), 6);
    }

    #[test]
    fn merged_is_commutative() {
        let mut left = CouplingTable::new();
        left.record("a", "b");
        let mut right = CouplingTable::new();
        right.record("a", "b");
        right.record("b", "c");

        assert_eq!(left.clone().merged(right.clone()), right.merged(left));
    }

    #[test]
    fn from_iter_accumulates_duplicates() {
        let pair = FilePair::new("a", "b").unwrap();
        let table: CouplingTable = vec![(pair.clone(), 2), (pair.clone(), 3)].into_iter().collect();
        assert_eq!(table.count(&pair), 5);
    }
}
