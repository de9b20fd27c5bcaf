//! Progress events emitted by the counters.
//!
//! The counters never log on their own; callers pass a [`ProgressSink`] and
//! decide where the events go. Sinks are called from rayon worker threads.

use crate::record::TimeWindow;

/// A milestone reached while counting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Logical counting began over `commits` records.
    LogicalStarted { commits: usize },
    /// Logical counting produced `pairs` distinct pairs.
    LogicalFinished { pairs: usize },
    /// Temporal counting began for `windows` distinct widths.
    TemporalStarted { commits: usize, windows: usize },
    /// One window's table is complete.
    WindowFinished { window: TimeWindow, pairs: usize },
    /// Records were unsorted and the full scan is used instead.
    FullScanFallback { commits: usize },
}

/// Receiver for [`ProgressEvent`]s.
///
/// Any `Fn(ProgressEvent) + Sync` closure is a sink.
///
/// # Examples
///
/// ```
/// use std::sync::Mutex;
/// use cochange_coupling::{logical::logical_coupling, CommitRecord, ProgressEvent};
///
/// let seen = Mutex::new(Vec::new());
/// let sink = |event: ProgressEvent| seen.lock().unwrap().push(event);
///
/// logical_coupling(&[CommitRecord::new(0, ["a", "b"])], &sink);
/// assert_eq!(seen.lock().unwrap().len(), 2);
/// ```
pub trait ProgressSink: Sync {
    fn report(&self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent) + Sync,
{
    fn report(&self, event: ProgressEvent) {
        self(event)
    }
}

/// A sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _event: ProgressEvent) {}
}
