//! Logical and temporal counting over one record sequence.

use cochange_core::{AnalysisConfig, CochangeError, OrderPolicy};

use crate::logical::logical_coupling;
use crate::progress::ProgressSink;
use crate::ranking::{rank_all, top_n, top_n_per_window};
use crate::record::{CommitRecord, TimeWindow};
use crate::report::{CouplingReport, PairCount, WindowCoupling};
use crate::table::CouplingTable;
use crate::temporal::{temporal_coupling, WindowTables};

/// Inputs to [`analyze`] beyond the records themselves.
///
/// # Examples
///
/// ```
/// use cochange_core::AnalysisConfig;
/// use cochange_coupling::{AnalysisOptions, TimeWindow};
///
/// let options = AnalysisOptions::from_config(&AnalysisConfig::default());
/// assert_eq!(options.windows[0], TimeWindow::from_hours(24));
/// assert_eq!(options.top_n, 3);
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Temporal window widths.
    pub windows: Vec<TimeWindow>,
    /// Entries per ranked table.
    pub top_n: usize,
    /// Behavior on unsorted records.
    pub order_policy: OrderPolicy,
}

impl AnalysisOptions {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            windows: config
                .windows_hours
                .iter()
                .map(|h| TimeWindow::from_hours(*h))
                .collect(),
            top_n: config.top_n,
            order_policy: config.order_policy,
        }
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

/// Raw coupling tables for one run.
#[derive(Debug, Clone)]
pub struct CouplingAnalysis {
    /// Number of records analyzed.
    pub commits_analyzed: usize,
    /// Earliest and latest record timestamps, if any.
    pub time_range: Option<(i64, i64)>,
    pub logical: CouplingTable,
    pub temporal: WindowTables,
}

/// Run logical and temporal counting over `commits`.
///
/// # Errors
///
/// Returns [`CochangeError::InvalidInputOrder`] for unsorted records under
/// [`OrderPolicy::Reject`].
///
/// # Examples
///
/// ```
/// use cochange_coupling::{analyze, AnalysisOptions, CommitRecord, NoProgress};
///
/// let commits = vec![
///     CommitRecord::new(0, ["a.js", "b.js"]),
///     CommitRecord::new(3600, ["b.js", "c.js"]),
/// ];
/// let analysis = analyze(&commits, &AnalysisOptions::default(), &NoProgress).unwrap();
/// assert_eq!(analysis.logical.len(), 2);
/// assert_eq!(analysis.temporal.len(), 3);
///
/// let report = analysis.report(Some(1));
/// assert_eq!(report.logical.len(), 1);
/// ```
pub fn analyze(
    commits: &[CommitRecord],
    options: &AnalysisOptions,
    progress: &dyn ProgressSink,
) -> Result<CouplingAnalysis, CochangeError> {
    // Order is checked first so a rejected run does no counting.
    let temporal = temporal_coupling(commits, &options.windows, options.order_policy, progress)?;
    let logical = logical_coupling(commits, progress);

    let time_range = commits
        .iter()
        .map(|c| c.timestamp)
        .fold(None, |range, t| match range {
            None => Some((t, t)),
            Some((lo, hi)) => Some((t.min(lo), t.max(hi))),
        });

    Ok(CouplingAnalysis {
        commits_analyzed: commits.len(),
        time_range,
        logical,
        temporal,
    })
}

impl CouplingAnalysis {
    /// Rank and shape the tables. `limit` of `None` keeps every pair.
    pub fn report(&self, limit: Option<usize>) -> CouplingReport {
        let logical = match limit {
            Some(n) => top_n(&self.logical, n),
            None => rank_all(&self.logical),
        };
        let temporal = match limit {
            Some(n) => top_n_per_window(&self.temporal, n),
            None => self
                .temporal
                .iter()
                .map(|(window, table)| (*window, rank_all(table)))
                .collect(),
        };

        CouplingReport {
            commits_analyzed: self.commits_analyzed,
            first_commit: self.time_range.map(|(lo, _)| lo),
            last_commit: self.time_range.map(|(_, hi)| hi),
            logical: logical.iter().map(PairCount::from).collect(),
            temporal: temporal
                .iter()
                .map(|(window, entries)| WindowCoupling::new(*window, entries))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{NoProgress, ProgressEvent};

    #[test]
    fn options_follow_config() {
        let config = AnalysisConfig {
            windows_hours: vec![1, 2],
            top_n: 7,
            order_policy: OrderPolicy::FullScan,
        };
        let options = AnalysisOptions::from_config(&config);
        assert_eq!(
            options.windows,
            vec![TimeWindow::from_secs(3600), TimeWindow::from_secs(7200)]
        );
        assert_eq!(options.top_n, 7);
        assert_eq!(options.order_policy, OrderPolicy::FullScan);
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let analysis = analyze(&[], &AnalysisOptions::default(), &NoProgress).unwrap();
        assert_eq!(analysis.commits_analyzed, 0);
        assert!(analysis.time_range.is_none());
        assert!(analysis.logical.is_empty());
        assert!(analysis.temporal.values().all(CouplingTable::is_empty));

        let report = analysis.report(Some(3));
        assert!(report.logical.is_empty());
        assert_eq!(report.temporal.len(), 3);
        assert!(report.temporal.iter().all(|w| w.pairs.is_empty()));
    }

    #[test]
    fn unsorted_input_rejected_before_logical_counting() {
        let commits = vec![
            CommitRecord::new(10, ["a", "b"]),
            CommitRecord::new(0, ["a", "b"]),
        ];
        let events = std::sync::Mutex::new(Vec::new());
        let sink = |event: ProgressEvent| events.lock().unwrap().push(event);

        let result = analyze(&commits, &AnalysisOptions::default(), &sink);
        assert!(matches!(
            result,
            Err(CochangeError::InvalidInputOrder { .. })
        ));
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn report_limit_and_raw() {
        let commits = vec![
            CommitRecord::new(0, ["a", "b", "c"]),
            CommitRecord::new(100, ["a", "b"]),
        ];
        let analysis = analyze(&commits, &AnalysisOptions::default(), &NoProgress).unwrap();
        assert_eq!(analysis.time_range, Some((0, 100)));

        let top = analysis.report(Some(1));
        assert_eq!(top.logical.len(), 1);
        assert_eq!(top.logical[0].files, ["a".to_string(), "b".to_string()]);
        assert_eq!(top.logical[0].count, 2);

        let raw = analysis.report(None);
        assert_eq!(raw.logical.len(), 3);
        assert_eq!(raw.first_commit, Some(0));
        assert_eq!(raw.last_commit, Some(100));
    }
}
