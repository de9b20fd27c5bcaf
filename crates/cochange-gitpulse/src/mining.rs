//! Git history extraction via git2.
//!
//! Mines commit history from a repository, extracting per-commit file
//! changes, author info, and committer timestamps.

use std::path::Path;

use cochange_core::{CochangeError, MiningConfig};
use git2::{Delta, DiffFindOptions, DiffOptions, Repository, Sort};

/// Raw commit data extracted from git history.
///
/// # Examples
///
/// ```
/// use cochange_gitpulse::mining::CommitInfo;
///
/// let info = CommitInfo {
///     hash: "abc12345".into(),
///     author: "alice".into(),
///     email: "alice@example.com".into(),
///     timestamp: 1700000000,
///     files_changed: vec![],
/// };
/// assert_eq!(info.author, "alice");
/// ```
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// Short commit hash.
    pub hash: String,
    /// Author name.
    pub author: String,
    /// Author email.
    pub email: String,
    /// Committer Unix timestamp.
    pub timestamp: i64,
    /// Files touched by this commit.
    pub files_changed: Vec<FileChange>,
}

/// A single file change within a commit.
///
/// # Examples
///
/// ```
/// use cochange_gitpulse::mining::{ChangeStatus, FileChange};
///
/// let change = FileChange {
///     path: "src/index.js".into(),
///     status: ChangeStatus::Modified,
/// };
/// assert!(change.status.has_new_path());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FileChange {
    /// File path relative to repo root. For deletions, the removed path.
    pub path: String,
    /// Type of change.
    pub status: ChangeStatus,
}

/// Status of a file change within a commit.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeStatus {
    /// New file.
    Added,
    /// Existing file modified.
    Modified,
    /// File removed.
    Deleted,
    /// File renamed from another path.
    Renamed {
        /// Original path before rename.
        from: String,
    },
}

impl ChangeStatus {
    /// Whether the file still exists after the commit.
    pub fn has_new_path(&self) -> bool {
        !matches!(self, ChangeStatus::Deleted)
    }
}

/// Options for history mining.
///
/// # Examples
///
/// ```
/// use cochange_gitpulse::mining::MiningOptions;
///
/// let opts = MiningOptions::default();
/// assert!(opts.since_days.is_none());
/// assert!(!opts.include_merges);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MiningOptions {
    /// Only include commits from the last N days (default: all history).
    pub since_days: Option<u64>,
    /// Skip commits touching more files than this (default: no limit).
    pub max_files_per_commit: Option<usize>,
    /// Branch to walk (default: HEAD).
    pub branch: Option<String>,
    /// Diff merge commits against their first parent (default: skip them).
    pub include_merges: bool,
}

impl MiningOptions {
    pub fn from_config(config: &MiningConfig) -> Self {
        Self {
            since_days: config.since_days,
            max_files_per_commit: config.max_files_per_commit,
            branch: config.branch.clone(),
            include_merges: config.include_merges,
        }
    }
}

/// Mine commit history from a git repository.
///
/// Returns commits in reverse chronological order (newest first). Merge
/// commits are skipped unless `include_merges` is set.
///
/// # Errors
///
/// Returns [`CochangeError::Git`] if the repository cannot be opened or walked.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use cochange_gitpulse::mining::{mine_history, MiningOptions};
///
/// let commits = mine_history(Path::new("."), &MiningOptions::default()).unwrap();
/// for c in &commits {
///     println!("{}: {} files ({})", c.hash, c.files_changed.len(), c.author);
/// }
/// ```
pub fn mine_history(
    repo_path: &Path,
    options: &MiningOptions,
) -> Result<Vec<CommitInfo>, CochangeError> {
    let repo = Repository::open(repo_path)
        .map_err(|e| CochangeError::Git(format!("failed to open repository: {e}")))?;

    let mut revwalk = repo
        .revwalk()
        .map_err(|e| CochangeError::Git(format!("failed to create revwalk: {e}")))?;

    revwalk
        .set_sorting(Sort::TIME)
        .map_err(|e| CochangeError::Git(format!("failed to sort revwalk: {e}")))?;

    // Start from HEAD or specified branch
    if let Some(ref branch) = options.branch {
        let reference = repo
            .resolve_reference_from_short_name(branch)
            .map_err(|e| CochangeError::Git(format!("failed to resolve branch '{branch}': {e}")))?;
        let oid = reference
            .target()
            .ok_or_else(|| CochangeError::Git("branch has no target".into()))?;
        revwalk
            .push(oid)
            .map_err(|e| CochangeError::Git(format!("failed to push oid: {e}")))?;
    } else {
        revwalk
            .push_head()
            .map_err(|e| CochangeError::Git(format!("failed to push HEAD: {e}")))?;
    }

    let cutoff = options.since_days.and_then(compute_cutoff);
    let mut commits = Vec::new();

    for oid_result in revwalk {
        let oid = oid_result.map_err(|e| CochangeError::Git(format!("revwalk error: {e}")))?;

        let commit = repo
            .find_commit(oid)
            .map_err(|e| CochangeError::Git(format!("failed to find commit: {e}")))?;

        let timestamp = commit.time().seconds();
        if cutoff.is_some_and(|cutoff| timestamp < cutoff) {
            break;
        }

        if commit.parent_count() > 1 && !options.include_merges {
            continue;
        }

        let files_changed = extract_file_changes(&repo, &commit)?;

        // Skip commits with too many files (large refactors)
        if options
            .max_files_per_commit
            .is_some_and(|max| files_changed.len() > max)
        {
            continue;
        }

        let author = commit.author();
        let hash = oid.to_string();

        commits.push(CommitInfo {
            hash: hash[..hash.len().min(8)].to_string(),
            author: author.name().unwrap_or("unknown").to_string(),
            email: author.email().unwrap_or("unknown").to_string(),
            timestamp,
            files_changed,
        });
    }

    Ok(commits)
}

/// Oldest timestamp to keep, or `None` when the span reaches past the
/// representable range and all history qualifies.
fn compute_cutoff(since_days: u64) -> Option<i64> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let now = i64::try_from(now).unwrap_or(i64::MAX);
    i64::try_from(since_days)
        .ok()
        .and_then(|days| days.checked_mul(86_400))
        .and_then(|span| now.checked_sub(span))
}

fn extract_file_changes(
    repo: &Repository,
    commit: &git2::Commit,
) -> Result<Vec<FileChange>, CochangeError> {
    let commit_tree = commit
        .tree()
        .map_err(|e| CochangeError::Git(format!("failed to get commit tree: {e}")))?;

    let parent_tree = if commit.parent_count() > 0 {
        let parent = commit
            .parent(0)
            .map_err(|e| CochangeError::Git(format!("failed to get parent: {e}")))?;
        Some(
            parent
                .tree()
                .map_err(|e| CochangeError::Git(format!("failed to get parent tree: {e}")))?,
        )
    } else {
        None
    };

    let mut diff_opts = DiffOptions::new();
    let mut diff = repo
        .diff_tree_to_tree(
            parent_tree.as_ref(),
            Some(&commit_tree),
            Some(&mut diff_opts),
        )
        .map_err(|e| CochangeError::Git(format!("failed to compute diff: {e}")))?;

    // Enable rename detection
    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))
        .map_err(|e| CochangeError::Git(format!("failed to find renames: {e}")))?;

    let mut changes = Vec::new();
    for delta in diff.deltas() {
        let new_path = path_string(delta.new_file().path());
        let old_path = path_string(delta.old_file().path());

        let (path, status) = match delta.status() {
            Delta::Added => (new_path, ChangeStatus::Added),
            Delta::Deleted => (old_path, ChangeStatus::Deleted),
            Delta::Renamed => (new_path, ChangeStatus::Renamed { from: old_path }),
            _ => (new_path, ChangeStatus::Modified),
        };

        if path.is_empty() {
            continue;
        }
        changes.push(FileChange { path, status });
    }

    Ok(changes)
}

fn path_string(path: Option<&Path>) -> String {
    path.map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mining_options_defaults_are_correct() {
        let opts = MiningOptions::default();
        assert!(opts.since_days.is_none());
        assert!(opts.max_files_per_commit.is_none());
        assert!(opts.branch.is_none());
        assert!(!opts.include_merges);
    }

    #[test]
    fn options_follow_config() {
        let config = MiningConfig {
            extensions: vec!["js".into()],
            since_days: Some(30),
            max_files_per_commit: Some(10),
            branch: Some("main".into()),
            include_merges: true,
        };
        let opts = MiningOptions::from_config(&config);
        assert_eq!(opts.since_days, Some(30));
        assert_eq!(opts.max_files_per_commit, Some(10));
        assert_eq!(opts.branch.as_deref(), Some("main"));
        assert!(opts.include_merges);
    }

    #[test]
    fn only_deletions_lose_their_new_path() {
        assert!(ChangeStatus::Added.has_new_path());
        assert!(ChangeStatus::Modified.has_new_path());
        assert!(ChangeStatus::Renamed {
            from: "old.js".into()
        }
        .has_new_path());
        assert!(!ChangeStatus::Deleted.has_new_path());
    }

    #[test]
    fn cutoff_is_in_the_past() {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let cutoff = compute_cutoff(2).unwrap();
        assert!(cutoff <= now - 2 * 86400);
        assert!(cutoff > now - 3 * 86400);
    }

    #[test]
    fn out_of_range_spans_keep_all_history() {
        assert_eq!(compute_cutoff(u64::MAX), None);
        assert_eq!(compute_cutoff(1 << 50), None);
        assert!(compute_cutoff(0).is_some());
    }

    #[test]
    fn opening_a_non_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = mine_history(dir.path(), &MiningOptions::default()).unwrap_err();
        assert!(matches!(err, CochangeError::Git(_)));
    }
}
