//! Top-N extraction from coupling tables.
//!
//! Entries are ordered by count descending; ties go to the lexicographically
//! smaller canonical pair (first path, then second path).

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{FilePair, TimeWindow};
use crate::table::CouplingTable;
use crate::temporal::WindowTables;

/// A ranked pair and its co-change count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopEntry {
    pub pair: FilePair,
    pub count: u64,
}

/// The `n` highest-count entries of `table`, in rank order.
///
/// Returns every entry when the table holds fewer than `n`, and nothing for
/// `n == 0`.
///
/// # Examples
///
/// ```
/// use cochange_coupling::{ranking::top_n, CouplingTable};
///
/// let mut table = CouplingTable::new();
/// table.record("c.js", "d.js");
/// table.record("a.js", "b.js");
/// table.record("a.js", "b.js");
/// table.record("a.js", "c.js");
///
/// let top = top_n(&table, 2);
/// assert_eq!(top[0].pair.first(), "a.js");
/// assert_eq!(top[0].count, 2);
/// // one-count tie: (a.js, c.js) sorts before (c.js, d.js)
/// assert_eq!(top[1].pair.second(), "c.js");
/// ```
pub fn top_n(table: &CouplingTable, n: usize) -> Vec<TopEntry> {
    if n == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(&FilePair, u64)> = table.iter().map(|(pair, count)| (pair, *count)).collect();
    if n < ranked.len() {
        ranked.select_nth_unstable_by(n - 1, rank_order);
        ranked.truncate(n);
    }
    ranked.sort_unstable_by(rank_order);

    ranked
        .into_iter()
        .map(|(pair, count)| TopEntry {
            pair: pair.clone(),
            count,
        })
        .collect()
}

/// Every entry of `table` in rank order.
pub fn rank_all(table: &CouplingTable) -> Vec<TopEntry> {
    top_n(table, table.len())
}

/// Apply [`top_n`] to each window's table.
pub fn top_n_per_window(tables: &WindowTables, n: usize) -> BTreeMap<TimeWindow, Vec<TopEntry>> {
    tables
        .iter()
        .map(|(window, table)| (*window, top_n(table, n)))
        .collect()
}

fn rank_order(a: &(&FilePair, u64), b: &(&FilePair, u64)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_from(entries: &[(&str, &str, u64)]) -> CouplingTable {
        entries
            .iter()
            .map(|(a, b, count)| (FilePair::new(a, b).unwrap(), *count))
            .collect()
    }

    fn keys(entries: &[TopEntry]) -> Vec<(String, String, u64)> {
        entries
            .iter()
            .map(|e| (e.pair.first().to_string(), e.pair.second().to_string(), e.count))
            .collect()
    }

    #[test]
    fn orders_by_count_then_pair() {
        let table = table_from(&[
            ("b", "c", 5),
            ("a", "z", 5),
            ("a", "b", 9),
            ("a", "c", 5),
            ("x", "y", 1),
        ]);

        let top = top_n(&table, 4);
        assert_eq!(
            keys(&top),
            vec![
                ("a".into(), "b".into(), 9),
                ("a".into(), "c".into(), 5),
                ("a".into(), "z".into(), 5),
                ("b".into(), "c".into(), 5),
            ]
        );
    }

    #[test]
    fn zero_returns_nothing() {
        let table = table_from(&[("a", "b", 3)]);
        assert!(top_n(&table, 0).is_empty());
    }

    #[test]
    fn fewer_entries_than_n_returns_all() {
        let table = table_from(&[("a", "b", 3), ("c", "d", 1)]);
        let top = top_n(&table, 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].count, 3);
    }

    #[test]
    fn empty_table_ranks_empty() {
        assert!(top_n(&CouplingTable::new(), 3).is_empty());
        assert!(rank_all(&CouplingTable::new()).is_empty());
    }

    #[test]
    fn ranking_is_deterministic() {
        let entries: Vec<(String, String, u64)> = (0..50)
            .map(|i| (format!("f{i:02}"), format!("g{i:02}"), (i % 3) as u64))
            .collect();
        let table: CouplingTable = entries
            .iter()
            .map(|(a, b, c)| (FilePair::new(a, b).unwrap(), *c))
            .collect();

        let first = top_n(&table, 20);
        let second = top_n(&table, 20);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn top_n_is_prefix_of_full_ranking() {
        let table = table_from(&[
            ("a", "b", 2),
            ("a", "c", 2),
            ("b", "c", 7),
            ("c", "d", 1),
            ("d", "e", 2),
        ]);
        let all = rank_all(&table);
        for n in 0..=table.len() {
            assert_eq!(top_n(&table, n), all[..n].to_vec());
        }
    }

    #[test]
    fn per_window_ranking_keeps_every_window() {
        let mut tables = WindowTables::new();
        tables.insert(TimeWindow::from_hours(24), table_from(&[("a", "b", 1)]));
        tables.insert(TimeWindow::from_hours(48), CouplingTable::new());

        let ranked = top_n_per_window(&tables, 3);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[&TimeWindow::from_hours(24)].len(), 1);
        assert!(ranked[&TimeWindow::from_hours(48)].is_empty());
    }
}
