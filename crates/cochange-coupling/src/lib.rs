//! Co-change coupling engine: logical and temporal coupling between files.
//!
//! Consumes commit records sorted ascending by timestamp and produces
//! per-pair coupling tables:
//! - [`logical`] counts pairs changed in the same commit
//! - [`temporal`] counts pairs changed in different commits within a window
//! - [`ranking`] extracts the top N pairs of any table
//! - [`report`] shapes ranked results into serializable records

pub mod analysis;
pub mod logical;
pub mod progress;
pub mod ranking;
pub mod record;
pub mod report;
pub mod table;
pub mod temporal;

pub use analysis::{analyze, AnalysisOptions, CouplingAnalysis};
pub use progress::{NoProgress, ProgressEvent, ProgressSink};
pub use ranking::TopEntry;
pub use record::{CommitRecord, FilePair, TimeWindow};
pub use table::CouplingTable;
