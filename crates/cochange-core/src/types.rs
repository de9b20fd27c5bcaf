use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the temporal counter treats commit records that are not sorted
/// ascending by timestamp.
///
/// # Examples
///
/// ```
/// use cochange_core::OrderPolicy;
///
/// let policy: OrderPolicy = "full-scan".parse().unwrap();
/// assert_eq!(policy, OrderPolicy::FullScan);
/// assert_eq!(OrderPolicy::default(), OrderPolicy::Reject);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderPolicy {
    /// Fail with [`CochangeError::InvalidInputOrder`](crate::CochangeError::InvalidInputOrder).
    #[default]
    Reject,
    /// Compare every later record against every earlier one.
    FullScan,
}

impl fmt::Display for OrderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderPolicy::Reject => write!(f, "reject"),
            OrderPolicy::FullScan => write!(f, "full-scan"),
        }
    }
}

impl FromStr for OrderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(OrderPolicy::Reject),
            "full-scan" | "fullscan" => Ok(OrderPolicy::FullScan),
            other => Err(format!("unknown order policy: {other}")),
        }
    }
}

/// Output format for CLI and reports.
///
/// # Examples
///
/// ```
/// use cochange_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("sarif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn output_format_display_round_trips() {
        for fmt in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Markdown] {
            assert_eq!(fmt.to_string().parse::<OutputFormat>().unwrap(), fmt);
        }
    }

    #[test]
    fn order_policy_parses_both_spellings() {
        assert_eq!("reject".parse::<OrderPolicy>().unwrap(), OrderPolicy::Reject);
        assert_eq!(
            "FullScan".parse::<OrderPolicy>().unwrap(),
            OrderPolicy::FullScan
        );
        assert!("sort".parse::<OrderPolicy>().is_err());
    }

    #[test]
    fn order_policy_serde_uses_kebab_case() {
        let json = serde_json::to_string(&OrderPolicy::FullScan).unwrap();
        assert_eq!(json, "\"full-scan\"");
    }
}
