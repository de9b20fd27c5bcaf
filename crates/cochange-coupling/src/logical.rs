//! Logical coupling: files changed in the same commit.

use crate::progress::{ProgressEvent, ProgressSink};
use crate::record::CommitRecord;
use crate::table::CouplingTable;

/// Count, for every unordered file pair, the commits containing both files.
///
/// A commit with `k` files contributes `k·(k-1)/2` increments; commits with
/// fewer than two files contribute nothing. Record order is irrelevant here.
///
/// # Examples
///
/// ```
/// use cochange_coupling::{logical::logical_coupling, CommitRecord, NoProgress};
///
/// let commits = vec![
///     CommitRecord::new(0, ["a.js", "b.js"]),
///     CommitRecord::new(60, ["a.js", "b.js", "c.js"]),
/// ];
/// let table = logical_coupling(&commits, &NoProgress);
/// assert_eq!(table.get("a.js", "b.js"), 2);
/// assert_eq!(table.get("b.js", "c.js"), 1);
/// ```
pub fn logical_coupling(commits: &[CommitRecord], progress: &dyn ProgressSink) -> CouplingTable {
    progress.report(ProgressEvent::LogicalStarted {
        commits: commits.len(),
    });

    let mut table = CouplingTable::new();
    for commit in commits {
        let files: Vec<&str> = commit.files.iter().map(String::as_str).collect();
        for (i, a) in files.iter().enumerate() {
            for b in &files[i + 1..] {
                table.record(a, b);
            }
        }
    }

    progress.report(ProgressEvent::LogicalFinished { pairs: table.len() });
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;

    #[test]
    fn single_commit_yields_all_pairs_once() {
        let commits = vec![CommitRecord::new(0, ["A", "B", "C"])];
        let table = logical_coupling(&commits, &NoProgress);

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("A", "B"), 1);
        assert_eq!(table.get("A", "C"), 1);
        assert_eq!(table.get("B", "C"), 1);
    }

    #[test]
    fn single_file_and_empty_commits_contribute_nothing() {
        let commits = vec![
            CommitRecord::new(0, ["solo.js"]),
            CommitRecord::new(1, Vec::<String>::new()),
        ];
        assert!(logical_coupling(&commits, &NoProgress).is_empty());
    }

    #[test]
    fn empty_input_gives_empty_table() {
        assert!(logical_coupling(&[], &NoProgress).is_empty());
    }

    #[test]
    fn counts_accumulate_across_commits() {
        let commits = vec![
            CommitRecord::new(0, ["z.js", "a.js"]),
            CommitRecord::new(10, ["a.js", "z.js"]),
            CommitRecord::new(20, ["a.js", "m.js"]),
        ];
        let table = logical_coupling(&commits, &NoProgress);
        assert_eq!(table.get("a.js", "z.js"), 2);
        assert_eq!(table.get("a.js", "m.js"), 1);
        assert_eq!(table.get("m.js", "z.js"), 0);
    }

    #[test]
    fn commit_order_does_not_matter() {
        let forward = vec![
            CommitRecord::new(0, ["a", "b"]),
            CommitRecord::new(5, ["b", "c"]),
        ];
        let backward: Vec<_> = forward.iter().rev().cloned().collect();
        assert_eq!(
            logical_coupling(&forward, &NoProgress),
            logical_coupling(&backward, &NoProgress)
        );
    }
}
