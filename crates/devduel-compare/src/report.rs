//! The two report strategies behind the shared orchestrator.

use serde::{Deserialize, Serialize};

use crate::schema::ComparisonPayload;

/// Which output contract the model is held to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Strict JSON matching [`crate::schema::ComparisonPayload`].
    #[default]
    Analytics,
    /// Free-text markdown report with a fixed set of required headings.
    Narrative,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Analytics => write!(f, "analytics"),
            ReportFormat::Narrative => write!(f, "narrative"),
        }
    }
}

/// A validated comparison result, one variant per strategy.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ComparisonReport {
    Analytics(ComparisonPayload),
    Narrative(String),
}
