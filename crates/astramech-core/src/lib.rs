//! # AstraMech Core
//!
//! The deterministic KPI engine for AstraMech.
//!
//! Raw financial, HR and operational records go in; named, benchmarked
//! metrics come out, together with an efficiency score and the list of
//! inefficiencies worth handing to a remediation agent.
//!
//! ## Layout
//!
//! - [`benchmark`]: industry benchmark tables and status classification
//! - [`calculator`]: KPI derivation, inefficiency detection, scoring
//! - [`input`]: the raw input document
//! - [`profile`]: the validated company questionnaire
//! - [`analysis`]: profile + input -> [`AnalysisResult`]
//! - [`report`]: plain-text rendering grouped by status
//!
//! The core never logs and never touches the network. File access is
//! limited to loading benchmark and profile documents.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod analysis;
pub mod benchmark;
pub mod calculator;
pub mod error;
pub mod input;
pub mod profile;
pub mod report;

pub use analysis::{AnalysisResult, analyze};
pub use benchmark::{BenchmarkManager, BenchmarkSet, BenchmarkSource, BenchmarkTable};
pub use calculator::{
    FinancialKpis, HrKpis, Inefficiency, KpiCalculator, KpiResults, OperationalKpis,
    efficiency_score,
};
pub use error::{AstraError, Result};
pub use input::{EmployeeRecord, FinancialRecord, HrData, KpiInput, OperationalData};
pub use profile::{CompanyProfile, FileFormat, Industry};
pub use report::KpiReport;

// =============================================================================
// KPI STATUS
// =============================================================================

/// Qualitative classification of a metric against its benchmark.
///
/// Variants are ordered from worst to best, so `Ord` sorts by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiStatus {
    Critical,
    Warning,
    Good,
    Excellent,
}

impl KpiStatus {
    /// All statuses, most severe first.
    pub const BY_SEVERITY: [KpiStatus; 4] = [
        KpiStatus::Critical,
        KpiStatus::Warning,
        KpiStatus::Good,
        KpiStatus::Excellent,
    ];

    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            KpiStatus::Critical => "critical",
            KpiStatus::Warning => "warning",
            KpiStatus::Good => "good",
            KpiStatus::Excellent => "excellent",
        }
    }

    /// Whether a metric with this status should be flagged for remediation.
    #[must_use]
    pub fn is_inefficient(self) -> bool {
        matches!(self, KpiStatus::Warning | KpiStatus::Critical)
    }

    /// Points contributed to the efficiency score.
    #[must_use]
    pub fn score_points(self) -> f64 {
        match self {
            KpiStatus::Excellent => 100.0,
            KpiStatus::Good => 80.0,
            KpiStatus::Warning => 50.0,
            KpiStatus::Critical => 20.0,
        }
    }
}

impl fmt::Display for KpiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// KPI CATEGORY
// =============================================================================

/// The area of the business a metric describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiCategory {
    Financial,
    Hr,
    Operational,
    General,
}

impl KpiCategory {
    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            KpiCategory::Financial => "financial",
            KpiCategory::Hr => "hr",
            KpiCategory::Operational => "operational",
            KpiCategory::General => "general",
        }
    }

    /// The agent that owns remediation for this category.
    #[must_use]
    pub fn recommended_agent(self) -> &'static str {
        match self {
            KpiCategory::Financial => "financial_optimizer",
            KpiCategory::Hr => "hr_optimizer",
            KpiCategory::Operational => "operations_optimizer",
            KpiCategory::General => "diagnostic_agent",
        }
    }

    /// Issue type reported for an inefficiency in this category.
    #[must_use]
    pub fn issue_type(self) -> &'static str {
        match self {
            KpiCategory::Financial => "financial_performance",
            KpiCategory::Hr => "high_turnover",
            KpiCategory::Operational => "operational_efficiency",
            KpiCategory::General => "general_performance",
        }
    }
}

impl fmt::Display for KpiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// KPI METRIC
// =============================================================================

/// A named metric paired with its benchmark and status.
///
/// Metrics are immutable values: they are derived on every run and never
/// edited afterwards. Use [`KpiCalculator`] or [`KpiMetric::new`] to build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiMetric {
    name: String,
    category: KpiCategory,
    value: f64,
    benchmark: f64,
    status: KpiStatus,
    description: String,
}

impl KpiMetric {
    /// Create a metric with an already-classified status.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        category: KpiCategory,
        value: f64,
        benchmark: f64,
        status: KpiStatus,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            value,
            benchmark,
            status,
            description: description.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn category(&self) -> KpiCategory {
        self.category
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Benchmark the value was compared against. `0.0` means none was available.
    #[must_use]
    pub fn benchmark(&self) -> f64 {
        self.benchmark
    }

    #[must_use]
    pub fn status(&self) -> KpiStatus {
        self.status
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether a real benchmark backed the status.
    #[must_use]
    pub fn has_benchmark(&self) -> bool {
        self.benchmark != 0.0
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_orders_by_severity() {
        let mut statuses = vec![
            KpiStatus::Good,
            KpiStatus::Critical,
            KpiStatus::Excellent,
            KpiStatus::Warning,
        ];
        statuses.sort();
        assert_eq!(statuses, KpiStatus::BY_SEVERITY.to_vec());
    }

    #[test]
    fn only_warning_and_critical_are_inefficient() {
        assert!(KpiStatus::Critical.is_inefficient());
        assert!(KpiStatus::Warning.is_inefficient());
        assert!(!KpiStatus::Good.is_inefficient());
        assert!(!KpiStatus::Excellent.is_inefficient());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&KpiStatus::Excellent).ok();
        assert_eq!(json.as_deref(), Some("\"excellent\""));
    }

    #[test]
    fn every_category_has_an_agent() {
        for category in [
            KpiCategory::Financial,
            KpiCategory::Hr,
            KpiCategory::Operational,
            KpiCategory::General,
        ] {
            assert!(!category.recommended_agent().is_empty());
            assert!(!category.issue_type().is_empty());
        }
    }

    #[test]
    fn metric_without_benchmark() {
        let metric = KpiMetric::new(
            "Total Employees",
            KpiCategory::Hr,
            12.0,
            0.0,
            KpiStatus::Good,
            "headcount",
        );
        assert!(!metric.has_benchmark());
        assert_eq!(metric.name(), "Total Employees");
    }
}
