//! Temporal coupling: files changed in different commits close in time.
//!
//! For a window `w`, every pair of records `(i, j)` with `i < j` and
//! `t[j] - t[i] <= w` contributes one count per `(a, b)` in
//! `files(i) × files(j)` with `a != b`. Identical files in both records are
//! skipped, other combinations are not deduplicated.

use std::collections::{BTreeMap, BTreeSet};

use cochange_core::{CochangeError, OrderPolicy};
use rayon::prelude::*;

use crate::progress::{ProgressEvent, ProgressSink};
use crate::record::{check_order, CommitRecord, TimeWindow};
use crate::table::CouplingTable;

/// One coupling table per window width, ordered by width.
pub type WindowTables = BTreeMap<TimeWindow, CouplingTable>;

/// Count temporal coupling for each distinct width in `windows`.
///
/// Records must be sorted ascending by timestamp. Under
/// [`OrderPolicy::Reject`] unsorted input is an error; under
/// [`OrderPolicy::FullScan`] every later record is compared with every
/// earlier one, which gives the same tables as sorting first.
///
/// Windows are counted in parallel, and each window's outer loop is sharded
/// across threads with partial tables merged at the end.
///
/// # Errors
///
/// Returns [`CochangeError::InvalidInputOrder`] for unsorted records under
/// [`OrderPolicy::Reject`].
///
/// # Examples
///
/// ```
/// use cochange_core::OrderPolicy;
/// use cochange_coupling::temporal::temporal_coupling;
/// use cochange_coupling::{CommitRecord, NoProgress, TimeWindow};
///
/// let hour = 3600;
/// let commits = vec![
///     CommitRecord::new(0, ["A", "B"]),
///     CommitRecord::new(10 * hour, ["B", "C"]),
///     CommitRecord::new(30 * hour, ["A", "C"]),
/// ];
/// let day = TimeWindow::from_hours(24);
/// let tables = temporal_coupling(&commits, &[day], OrderPolicy::Reject, &NoProgress).unwrap();
/// assert_eq!(tables[&day].get("A", "B"), 2);
/// assert_eq!(tables[&day].get("B", "C"), 2);
/// ```
pub fn temporal_coupling(
    commits: &[CommitRecord],
    windows: &[TimeWindow],
    policy: OrderPolicy,
    progress: &dyn ProgressSink,
) -> Result<WindowTables, CochangeError> {
    let sorted = match check_order(commits) {
        Ok(()) => true,
        Err(err) => match policy {
            OrderPolicy::Reject => return Err(err),
            OrderPolicy::FullScan => {
                progress.report(ProgressEvent::FullScanFallback {
                    commits: commits.len(),
                });
                false
            }
        },
    };

    let widths: BTreeSet<TimeWindow> = windows.iter().copied().collect();
    progress.report(ProgressEvent::TemporalStarted {
        commits: commits.len(),
        windows: widths.len(),
    });

    let tables = widths
        .into_par_iter()
        .map(|window| {
            let table = if sorted {
                sliding_window_scan(commits, window)
            } else {
                full_scan(commits, window)
            };
            progress.report(ProgressEvent::WindowFinished {
                window,
                pairs: table.len(),
            });
            (window, table)
        })
        .collect();

    Ok(tables)
}

/// Single forward scan per start record: later records are visited until the
/// first one beyond the window, which ends the scan for that record.
fn sliding_window_scan(commits: &[CommitRecord], window: TimeWindow) -> CouplingTable {
    (0..commits.len())
        .into_par_iter()
        .fold(CouplingTable::new, |mut table, i| {
            let earlier = &commits[i];
            for later in commits[i + 1..]
                .iter()
                .take_while(|later| window.spans(earlier.timestamp, later.timestamp))
            {
                count_cross_pairs(&mut table, earlier, later);
            }
            table
        })
        .reduce(CouplingTable::new, CouplingTable::merged)
}

/// Quadratic fallback that assumes nothing about record order.
fn full_scan(commits: &[CommitRecord], window: TimeWindow) -> CouplingTable {
    (0..commits.len())
        .into_par_iter()
        .fold(CouplingTable::new, |mut table, i| {
            let first = &commits[i];
            for other in &commits[i + 1..] {
                if window.spans(first.timestamp, other.timestamp) {
                    count_cross_pairs(&mut table, first, other);
                }
            }
            table
        })
        .reduce(CouplingTable::new, CouplingTable::merged)
}

fn count_cross_pairs(table: &mut CouplingTable, earlier: &CommitRecord, later: &CommitRecord) {
    for a in &earlier.files {
        for b in &later.files {
            table.record(a, b);
        }
    }
}
