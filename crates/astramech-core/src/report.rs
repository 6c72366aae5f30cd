//! # Report Module
//!
//! Plain-text KPI report, grouped by status with the most severe first.
//! Formatting lives here so the calculator stays free of presentation.

use crate::{KpiMetric, KpiStatus};
use std::collections::BTreeMap;

/// Metrics grouped by status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiReport {
    groups: BTreeMap<KpiStatus, Vec<KpiMetric>>,
}

impl KpiReport {
    /// Group `metrics` by status, keeping input order inside a group.
    #[must_use]
    pub fn from_metrics(metrics: &[KpiMetric]) -> Self {
        let mut groups: BTreeMap<KpiStatus, Vec<KpiMetric>> = BTreeMap::new();
        for metric in metrics {
            groups.entry(metric.status()).or_default().push(metric.clone());
        }
        Self { groups }
    }

    /// Metrics with the given status.
    #[must_use]
    pub fn group(&self, status: KpiStatus) -> &[KpiMetric] {
        self.groups.get(&status).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Render with the standard template.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("┌─────────────────────────────────────┐\n");
        output.push_str("│ KPI ANALYSIS REPORT                 │\n");

        if self.is_empty() {
            output.push_str("├─────────────────────────────────────┤\n");
            output.push_str("│ - (no metrics computed)             │\n");
        }

        for status in KpiStatus::BY_SEVERITY {
            let metrics = self.group(status);
            if metrics.is_empty() {
                continue;
            }
            output.push_str("├─────────────────────────────────────┤\n");
            output.push_str(&format!("│ {} PERFORMANCE\n", status.as_str().to_uppercase()));
            for metric in metrics {
                output.push_str(&format!("│ - {}: {}\n", metric.name(), metric.description()));
            }
        }

        output.push_str("└─────────────────────────────────────┘\n");
        output
    }
}
