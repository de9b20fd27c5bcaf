//! Commit records, canonical file pairs, and window widths.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;

use cochange_core::CochangeError;
use serde::{Deserialize, Serialize};

/// A normalized commit: when it happened and which files it touched.
///
/// # Examples
///
/// ```
/// use cochange_coupling::CommitRecord;
///
/// let record = CommitRecord::new(1_700_000_000, ["src/b.js", "src/a.js", "src/a.js"]);
/// assert_eq!(record.files.len(), 2);
/// assert_eq!(record.files.first().map(String::as_str), Some("src/a.js"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Unix timestamp of the commit, in seconds.
    pub timestamp: i64,
    /// Paths changed by the commit.
    pub files: BTreeSet<String>,
}

impl CommitRecord {
    /// Build a record, collapsing duplicate paths.
    pub fn new<I, S>(timestamp: i64, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            timestamp,
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

/// An unordered pair of distinct paths, stored in lexicographic order.
///
/// `FilePair::new("b", "a")` and `FilePair::new("a", "b")` produce the same
/// key. The derived ordering compares the first path, then the second.
///
/// # Examples
///
/// ```
/// use cochange_coupling::FilePair;
///
/// let pair = FilePair::new("src/z.js", "src/a.js").unwrap();
/// assert_eq!(pair.first(), "src/a.js");
/// assert_eq!(pair.second(), "src/z.js");
/// assert_eq!(pair, FilePair::new("src/a.js", "src/z.js").unwrap());
/// assert!(FilePair::new("same.js", "same.js").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilePair {
    first: String,
    second: String,
}

impl FilePair {
    /// Canonicalize `a` and `b` into a pair. Returns `None` when they are equal.
    pub fn new(a: &str, b: &str) -> Option<Self> {
        canonical(a, b).map(|(first, second)| Self {
            first: first.to_string(),
            second: second.to_string(),
        })
    }

    /// The lexicographically smaller path.
    pub fn first(&self) -> &str {
        &self.first
    }

    /// The lexicographically larger path.
    pub fn second(&self) -> &str {
        &self.second
    }
}

/// Order `a` and `b` without copying them. `None` for a self-pair.
pub(crate) fn canonical<'s>(a: &'s str, b: &'s str) -> Option<(&'s str, &'s str)> {
    match a.cmp(b) {
        std::cmp::Ordering::Less => Some((a, b)),
        std::cmp::Ordering::Greater => Some((b, a)),
        std::cmp::Ordering::Equal => None,
    }
}

/// Borrowed view of a canonical pair.
///
/// `FilePair` borrows as `dyn PairKey`, so a table can look up a
/// `(&str, &str)` key without allocating a `FilePair` first.
pub trait PairKey {
    /// The two paths, smaller first.
    fn key(&self) -> (&str, &str);
}

impl PairKey for FilePair {
    fn key(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }
}

impl PairKey for (&str, &str) {
    fn key(&self) -> (&str, &str) {
        (self.0, self.1)
    }
}

impl<'a> Borrow<dyn PairKey + 'a> for FilePair {
    fn borrow(&self) -> &(dyn PairKey + 'a) {
        self
    }
}

// Hash and Eq must agree between FilePair and its borrowed form.
impl Hash for FilePair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Hash for dyn PairKey + '_ {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialEq for dyn PairKey + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for dyn PairKey + '_ {}

impl fmt::Display for FilePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.first, self.second)
    }
}

/// Maximum gap between two commits for their files to count as temporally
/// coupled. Both ends are inclusive.
///
/// # Examples
///
/// ```
/// use cochange_coupling::TimeWindow;
///
/// let day = TimeWindow::from_hours(24);
/// assert_eq!(day.as_secs(), 86_400);
/// assert_eq!(day.to_string(), "24h");
/// assert!(day.spans(0, 86_400));
/// assert!(!day.spans(0, 86_401));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeWindow(u64);

impl TimeWindow {
    /// A window of `secs` seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// A window of `hours` hours.
    pub const fn from_hours(hours: u64) -> Self {
        Self(hours.saturating_mul(3600))
    }

    /// Width in seconds.
    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// Whether two timestamps are at most one window apart.
    pub fn spans(&self, earlier: i64, later: i64) -> bool {
        later.abs_diff(earlier) <= self.0
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            s if s > 0 && s % 3600 == 0 => write!(f, "{}h", s / 3600),
            s if s > 0 && s % 60 == 0 => write!(f, "{}m", s / 60),
            s => write!(f, "{s}s"),
        }
    }
}

/// Verify that records are sorted ascending by timestamp.
///
/// # Errors
///
/// Returns [`CochangeError::InvalidInputOrder`] naming the first record whose
/// timestamp is earlier than its predecessor's.
///
/// # Examples
///
/// ```
/// use cochange_coupling::CommitRecord;
/// use cochange_coupling::record::check_order;
///
/// let sorted = vec![CommitRecord::new(1, ["a"]), CommitRecord::new(1, ["b"])];
/// assert!(check_order(&sorted).is_ok());
///
/// let unsorted = vec![CommitRecord::new(5, ["a"]), CommitRecord::new(1, ["b"])];
/// assert!(check_order(&unsorted).is_err());
/// ```
pub fn check_order(commits: &[CommitRecord]) -> Result<(), CochangeError> {
    match commits
        .windows(2)
        .position(|w| w[1].timestamp < w[0].timestamp)
    {
        Some(pos) => Err(CochangeError::InvalidInputOrder {
            index: pos + 1,
            previous: commits[pos].timestamp,
            current: commits[pos + 1].timestamp,
        }),
        None => Ok(()),
    }
}

/// Load commit records from a JSON array of `{"timestamp", "files"}` objects.
///
/// Records are returned in file order; ordering is checked by the counters.
///
/// # Errors
///
/// Returns [`CochangeError::FileNotFound`] if `path` does not exist,
/// [`CochangeError::Io`] if it cannot be read, or
/// [`CochangeError::Serialization`] if the JSON is malformed.
pub fn load_records(path: &Path) -> Result<Vec<CommitRecord>, CochangeError> {
    if !path.exists() {
        return Err(CochangeError::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let records: Vec<CommitRecord> = serde_json::from_str(&content)?;
    Ok(records)
}
