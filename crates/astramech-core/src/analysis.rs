//! # Analysis Module
//!
//! Joins a [`CompanyProfile`] with its KPI input.
//!
//! The profile decides the benchmark industry and backs up a missing
//! headcount; the rest is [`KpiCalculator::calculate_all_kpis`].

use crate::calculator::{KpiCalculator, KpiResults};
use crate::input::KpiInput;
use crate::profile::CompanyProfile;
use crate::report::KpiReport;
use serde::{Deserialize, Serialize};

/// Result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub company_name: String,
    pub profile: CompanyProfile,
    pub kpi_results: KpiResults,
}

impl AnalysisResult {
    /// Whether any metric was flagged.
    #[must_use]
    pub fn has_inefficiencies(&self) -> bool {
        !self.kpi_results.inefficiencies.is_empty()
    }

    /// Plain-text report of the detailed metrics.
    #[must_use]
    pub fn report(&self) -> KpiReport {
        KpiReport::from_metrics(&self.kpi_results.metrics)
    }
}

/// Analyze `input` for the company described by `profile`.
///
/// The profile's industry always wins over any industry in `input`. The
/// profile's employee count fills in only when the input declares none,
/// neither on the HR side nor as `financial_data.employee_count`.
#[must_use]
pub fn analyze(profile: &CompanyProfile, input: &KpiInput, calculator: &KpiCalculator) -> AnalysisResult {
    let mut input = input.clone();
    input.industry = Some(profile.industry().as_str().to_string());

    let declares_headcount = input.hr_data.total_employees.is_some()
        || !input.hr_data.employees.is_empty()
        || input.financial_data.employee_count.is_some();
    if !declares_headcount {
        input.hr_data.total_employees = Some(u64::from(profile.employee_count()));
    }

    AnalysisResult {
        company_name: profile.company_name().to_string(),
        profile: profile.clone(),
        kpi_results: calculator.calculate_all_kpis(&input),
    }
}
