//! Serializable shapes of ranked coupling results.
//!
//! Logical results are a flat list of pairs; temporal results are one list
//! per window.

use serde::{Deserialize, Serialize};

use crate::ranking::TopEntry;
use crate::record::TimeWindow;

/// A file pair and its count, as written to reports.
///
/// # Examples
///
/// ```
/// use cochange_coupling::report::PairCount;
///
/// let entry = PairCount { files: ["a.js".into(), "b.js".into()], count: 4 };
/// let json = serde_json::to_string(&entry).unwrap();
/// assert_eq!(json, r#"{"files":["a.js","b.js"],"count":4}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairCount {
    /// The two paths, lexicographically ordered.
    pub files: [String; 2],
    /// Number of co-changes.
    pub count: u64,
}

impl From<&TopEntry> for PairCount {
    fn from(entry: &TopEntry) -> Self {
        Self {
            files: [
                entry.pair.first().to_string(),
                entry.pair.second().to_string(),
            ],
            count: entry.count,
        }
    }
}

/// Ranked temporal pairs for one window width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowCoupling {
    /// Human-readable width, e.g. `24h`.
    pub window: String,
    /// Width in seconds.
    pub window_secs: u64,
    pub pairs: Vec<PairCount>,
}

impl WindowCoupling {
    pub fn new(window: TimeWindow, entries: &[TopEntry]) -> Self {
        Self {
            window: window.to_string(),
            window_secs: window.as_secs(),
            pairs: entries.iter().map(PairCount::from).collect(),
        }
    }
}

/// Full result of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouplingReport {
    /// Number of commit records analyzed.
    pub commits_analyzed: usize,
    /// Timestamp of the earliest record.
    pub first_commit: Option<i64>,
    /// Timestamp of the latest record.
    pub last_commit: Option<i64>,
    /// Same-commit coupling.
    pub logical: Vec<PairCount>,
    /// Cross-commit coupling, one entry per window in ascending width.
    pub temporal: Vec<WindowCoupling>,
}
