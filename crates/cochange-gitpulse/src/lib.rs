//! Git history mining for co-change analysis.
//!
//! Walks commit history using git2 and turns it into the sorted,
//! extension-filtered commit records the coupling engine consumes.

pub mod mining;
pub mod normalize;
