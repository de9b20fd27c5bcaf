use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CochangeError;
use crate::types::OrderPolicy;

/// Top-level configuration loaded from `.cochange.toml`.
///
/// Supports layered resolution: CLI flags > local config > defaults.
///
/// # Examples
///
/// ```
/// use cochange_core::CochangeConfig;
///
/// let config = CochangeConfig::default();
/// assert_eq!(config.analysis.windows_hours, vec![24, 48, 72]);
/// assert_eq!(config.analysis.top_n, 3);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CochangeConfig {
    /// Coupling analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// History mining settings.
    #[serde(default)]
    pub mining: MiningConfig,
}

impl CochangeConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CochangeError::FileNotFound`] if `path` does not exist,
    /// [`CochangeError::Io`] if it cannot be read, or [`CochangeError::Toml`]
    /// if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cochange_core::CochangeConfig;
    /// use std::path::Path;
    ///
    /// let config = CochangeConfig::from_file(Path::new(".cochange.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, CochangeError> {
        if !path.exists() {
            return Err(CochangeError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`CochangeError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use cochange_core::CochangeConfig;
    ///
    /// let toml = r#"
    /// [analysis]
    /// top_n = 10
    /// "#;
    /// let config = CochangeConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.analysis.top_n, 10);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, CochangeError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Coupling analysis configuration.
///
/// # Examples
///
/// ```
/// use cochange_core::{AnalysisConfig, OrderPolicy};
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.order_policy, OrderPolicy::Reject);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Temporal window widths in hours (default: 24, 48, 72).
    #[serde(default = "default_windows_hours")]
    pub windows_hours: Vec<u64>,
    /// Number of top pairs to report per table (default: 3).
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Behavior on unsorted commit records (default: reject).
    #[serde(default)]
    pub order_policy: OrderPolicy,
}

fn default_windows_hours() -> Vec<u64> {
    vec![24, 48, 72]
}

fn default_top_n() -> usize {
    3
}

impl AnalysisConfig {
    /// Check the settings an analysis run cannot do without.
    ///
    /// # Errors
    ///
    /// Returns [`CochangeError::Config`] if no temporal window is configured.
    ///
    /// # Examples
    ///
    /// ```
    /// use cochange_core::AnalysisConfig;
    ///
    /// assert!(AnalysisConfig::default().validate().is_ok());
    ///
    /// let config = AnalysisConfig { windows_hours: vec![], ..AnalysisConfig::default() };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> crate::Result<()> {
        if self.windows_hours.is_empty() {
            return Err(CochangeError::Config(
                "no temporal windows configured; pass --window <HOURS> or set analysis.windows_hours"
                    .into(),
            ));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            windows_hours: default_windows_hours(),
            top_n: default_top_n(),
            order_policy: OrderPolicy::default(),
        }
    }
}

/// History mining configuration.
///
/// # Examples
///
/// ```
/// use cochange_core::MiningConfig;
///
/// let config = MiningConfig::default();
/// assert!(config.extensions.is_empty());
/// assert!(config.since_days.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Only count files with these extensions (empty: all files).
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Only include commits from the last N days.
    pub since_days: Option<u64>,
    /// Skip commits touching more files than this.
    pub max_files_per_commit: Option<usize>,
    /// Branch to walk (default: HEAD).
    pub branch: Option<String>,
    /// Diff merge commits against their first parent (default: skip them).
    #[serde(default)]
    pub include_merges: bool,
}
