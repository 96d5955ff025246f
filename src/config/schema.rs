use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::report::REPORT_TITLE;
use crate::scoring::WeightConfig;

/// Top-level config file.
///
/// Example YAML:
/// ```yaml
/// weights:
///   quality: 60
///   delivery: 40
/// report:
///   title: "Quarterly Supplier Review"
///   output_dir: "./reports"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Criterion weights in percent (default: quality 50, delivery 50)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Where exported reports are written (default: current directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Config {
    pub fn effective_weights(&self) -> WeightConfig {
        self.weights.clone().unwrap_or_default()
    }

    pub fn report_title(&self) -> String {
        self.report
            .as_ref()
            .and_then(|r| r.title.clone())
            .unwrap_or_else(|| REPORT_TITLE.to_string())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.report
            .as_ref()
            .and_then(|r| r.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
