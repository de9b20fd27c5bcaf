//! Core types, configuration, and error handling for cochange.
//!
//! This crate provides the shared foundation used by the other cochange crates:
//! - [`CochangeError`]: unified error type using `thiserror` and `miette`
//! - [`CochangeConfig`]: configuration loaded from `.cochange.toml`
//! - Shared types: [`OrderPolicy`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{AnalysisConfig, CochangeConfig, MiningConfig};
pub use error::CochangeError;
pub use types::{OrderPolicy, OutputFormat};

/// A convenience `Result` type for cochange operations.
pub type Result<T> = std::result::Result<T, CochangeError>;
