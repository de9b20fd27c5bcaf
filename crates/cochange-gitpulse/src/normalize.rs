//! Mined commits → sorted, filtered commit records.

use std::path::Path;

use cochange_coupling::CommitRecord;

use crate::mining::CommitInfo;

/// Turn mined commits into records the coupling engine accepts.
///
/// Keeps paths that exist after the commit and whose extension is in
/// `extensions` (case-insensitive, leading dot optional; an empty list keeps
/// every path). Commits left without files are dropped, and the rest are
/// stably sorted ascending by timestamp.
///
/// # Examples
///
/// ```
/// use cochange_gitpulse::mining::{ChangeStatus, CommitInfo, FileChange};
/// use cochange_gitpulse::normalize::normalize;
///
/// let change = |path: &str| FileChange { path: path.into(), status: ChangeStatus::Modified };
/// let commits = vec![
///     CommitInfo {
///         hash: "b".into(), author: "bob".into(), email: "bob@example.com".into(),
///         timestamp: 200,
///         files_changed: vec![change("app.js"), change("README.md")],
///     },
///     CommitInfo {
///         hash: "a".into(), author: "amy".into(), email: "amy@example.com".into(),
///         timestamp: 100,
///         files_changed: vec![change("style.css")],
///     },
/// ];
///
/// let records = normalize(&commits, &["js".to_string()]);
/// assert_eq!(records.len(), 1);
/// assert!(records[0].files.contains("app.js"));
/// ```
pub fn normalize(commits: &[CommitInfo], extensions: &[String]) -> Vec<CommitRecord> {
    let extensions: Vec<String> = extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    let mut records: Vec<CommitRecord> = commits
        .iter()
        .map(|commit| {
            CommitRecord::new(
                commit.timestamp,
                commit
                    .files_changed
                    .iter()
                    .filter(|change| change.status.has_new_path())
                    .filter(|change| has_extension(&change.path, &extensions))
                    .map(|change| change.path.clone()),
            )
        })
        .filter(|record| !record.files.is_empty())
        .collect();

    records.sort_by_key(|record| record.timestamp);
    records
}

fn has_extension(path: &str, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::{ChangeStatus, FileChange};

    fn make_commit(timestamp: i64, files: Vec<(&str, ChangeStatus)>) -> CommitInfo {
        CommitInfo {
            hash: format!("{timestamp:08x}"),
            author: "alice".into(),
            email: "alice@example.com".into(),
            timestamp,
            files_changed: files
                .into_iter()
                .map(|(path, status)| FileChange {
                    path: path.into(),
                    status,
                })
                .collect(),
        }
    }

    fn modified(path: &str) -> (&str, ChangeStatus) {
        (path, ChangeStatus::Modified)
    }

    #[test]
    fn output_is_sorted_ascending() {
        let commits = vec![
            make_commit(300, vec![modified("c.js")]),
            make_commit(100, vec![modified("a.js")]),
            make_commit(200, vec![modified("b.js")]),
        ];
        let records = normalize(&commits, &[]);
        let times: Vec<i64> = records.iter().map(|r| r.timestamp).collect();
        assert_eq!(times, vec![100, 200, 300]);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let commits = vec![
            make_commit(100, vec![modified("first.js")]),
            make_commit(100, vec![modified("second.js")]),
        ];
        let records = normalize(&commits, &[]);
        assert!(records[0].files.contains("first.js"));
        assert!(records[1].files.contains("second.js"));
    }

    #[test]
    fn extension_filter_is_case_insensitive_and_dot_tolerant() {
        let commits = vec![make_commit(
            1,
            vec![
                modified("src/App.JS"),
                modified("src/util.ts"),
                modified("Makefile"),
                modified("docs/guide.md"),
            ],
        )];
        let records = normalize(&commits, &[".js".to_string(), "TS".to_string()]);
        assert_eq!(records.len(), 1);
        let files: Vec<&str> = records[0].files.iter().map(String::as_str).collect();
        assert_eq!(files, vec!["src/App.JS", "src/util.ts"]);
    }

    #[test]
    fn commits_without_relevant_files_are_dropped() {
        let commits = vec![
            make_commit(1, vec![modified("README.md")]),
            make_commit(2, vec![modified("index.js")]),
            make_commit(3, vec![]),
        ];
        let records = normalize(&commits, &["js".to_string()]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp, 2);
    }

    #[test]
    fn deletions_are_excluded_but_renames_kept() {
        let commits = vec![make_commit(
            1,
            vec![
                ("gone.js", ChangeStatus::Deleted),
                (
                    "moved.js",
                    ChangeStatus::Renamed {
                        from: "old.js".into(),
                    },
                ),
                ("new.js", ChangeStatus::Added),
            ],
        )];
        let records = normalize(&commits, &[]);
        let files: Vec<&str> = records[0].files.iter().map(String::as_str).collect();
        assert_eq!(files, vec!["moved.js", "new.js"]);
    }

    #[test]
    fn empty_filter_keeps_extensionless_paths() {
        let commits = vec![make_commit(1, vec![modified("Dockerfile")])];
        assert_eq!(normalize(&commits, &[]).len(), 1);
        assert!(normalize(&commits, &["js".to_string()]).is_empty());
    }
}
