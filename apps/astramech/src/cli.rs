//! # CLI Commands
//!
//! Each command returns the text it would print so the binary stays a thin
//! dispatcher and the commands can be tested without capturing stdout.

use astramech_core::{
    AnalysisResult, AstraError, BenchmarkManager, BenchmarkSource, CompanyProfile, FileFormat,
    Industry, KpiCalculator, KpiCategory, KpiInput, KpiReport, KpiResults, analyze,
};
use crate::warn_defaulted;
use std::path::Path;
use tracing::{debug, info, warn};

// =============================================================================
// INPUT
// =============================================================================

/// Load and validate a KPI input document.
pub fn load_input(path: &Path) -> Result<KpiInput, AstraError> {
    let content = std::fs::read_to_string(path)?;
    let input: KpiInput = serde_json::from_str(&content)?;
    input.validate()?;
    debug!(
        path = %path.display(),
        employees = input.hr_data.employees.len(),
        "Loaded KPI input"
    );
    Ok(input)
}

// =============================================================================
// ANALYZE
// =============================================================================

/// Compute KPIs for an input file, optionally for a saved company profile.
pub fn cmd_analyze(
    calculator: &KpiCalculator,
    input_path: &Path,
    profile_path: Option<&Path>,
    json: bool,
) -> Result<String, AstraError> {
    let input = load_input(input_path)?;

    match profile_path {
        Some(path) => {
            let profile = CompanyProfile::load(path)?;
            let result = analyze(&profile, &input, calculator);
            warn_defaulted(&result.kpi_results);
            info!(
                company = %result.company_name,
                score = result.kpi_results.efficiency_score,
                inefficiencies = result.kpi_results.inefficiencies.len(),
                "Analysis complete"
            );
            if json {
                Ok(serde_json::to_string_pretty(&result)?)
            } else {
                Ok(render_analysis(&result))
            }
        }
        None => {
            let results = calculator.calculate_all_kpis(&input);
            warn_defaulted(&results);
            info!(
                industry = %results.industry,
                score = results.efficiency_score,
                inefficiencies = results.inefficiencies.len(),
                "KPI calculation complete"
            );
            if json {
                Ok(serde_json::to_string_pretty(&results)?)
            } else {
                Ok(render_results(&results))
            }
        }
    }
}

fn render_analysis(result: &AnalysisResult) -> String {
    let profile = &result.profile;
    let mut output = format!(
        "Company: {} ({}, {} employees, {} years)\n",
        result.company_name,
        profile.industry(),
        profile.employee_count(),
        profile.company_age_years()
    );
    output.push_str(&render_results(&result.kpi_results));
    output
}

fn render_results(results: &KpiResults) -> String {
    let mut output = format!(
        "Industry: {}\nEfficiency score: {:.1} / 100\n",
        results.industry, results.efficiency_score
    );

    for category in [KpiCategory::Financial, KpiCategory::Hr, KpiCategory::Operational] {
        let mut metrics = results.metrics_in(category).peekable();
        if metrics.peek().is_none() {
            continue;
        }
        output.push_str(&format!("\n{}\n", category.as_str().to_uppercase()));
        for metric in metrics {
            output.push_str(&format!(
                "  {:<32} {:>14.2}  benchmark {:>12.2}  {}\n",
                metric.name(),
                metric.value(),
                metric.benchmark(),
                metric.status()
            ));
        }
    }

    output.push('\n');
    output.push_str(&KpiReport::from_metrics(&results.metrics).to_text());

    if results.inefficiencies.is_empty() {
        output.push_str("\nNo inefficiencies found.\n");
    } else {
        output.push_str(&format!("\nInefficiencies ({}):\n", results.inefficiencies.len()));
        for issue in &results.inefficiencies {
            output.push_str(&format!(
                "  [{}] {} -> {}\n",
                issue.severity, issue.kpi_name, issue.recommended_agent
            ));
        }
    }

    if !results.defaulted.is_empty() {
        output.push_str(&format!("\nDefaulted: {}\n", results.defaulted.join(", ")));
    }
    output
}

// =============================================================================
// BENCHMARKS
// =============================================================================

/// List industries, or the benchmark set of one industry.
pub fn cmd_benchmarks(
    manager: &BenchmarkManager,
    industry: Option<&str>,
    json: bool,
) -> Result<String, AstraError> {
    match industry {
        Some(name) => {
            let set = manager.get_all_benchmarks(name);
            if json {
                return Ok(serde_json::to_string_pretty(&set)?);
            }
            let mut output = format!("Benchmarks for {name}");
            if !manager.has_industry(name) {
                output.push_str(" (not listed, using default)");
            }
            output.push('\n');
            for (metric, value) in &set {
                output.push_str(&format!("  {metric:<24} {value}\n"));
            }
            Ok(output)
        }
        None => {
            let industries = manager.industries();
            if json {
                return Ok(serde_json::to_string_pretty(&industries)?);
            }
            let mut output = format!("Source: {}\nIndustries:\n", describe_source(manager.source()));
            for name in industries {
                output.push_str(&format!("  {name}\n"));
            }
            Ok(output)
        }
    }
}

/// Human-readable origin of a benchmark table.
pub fn describe_source(source: &BenchmarkSource) -> String {
    match source {
        BenchmarkSource::Embedded => "embedded".to_string(),
        BenchmarkSource::File(path) => path.display().to_string(),
        BenchmarkSource::Fallback { path, reason } => {
            format!("embedded (fallback from {}: {reason})", path.display())
        }
    }
}

// =============================================================================
// COMPARE
// =============================================================================

/// Classify a single value against a benchmark.
pub fn cmd_compare(value: f64, benchmark: f64, lower_is_better: bool) -> Result<String, AstraError> {
    if !value.is_finite() || !benchmark.is_finite() {
        return Err(AstraError::Validation(
            "value and benchmark must be finite numbers".to_string(),
        ));
    }
    let status = BenchmarkManager::compare_to_benchmark(value, benchmark, !lower_is_better);
    Ok(status.to_string())
}

// =============================================================================
// PROFILE
// =============================================================================

/// Raw questionnaire answers as given on the command line.
#[derive(Debug, Clone)]
pub struct ProfileAnswers {
    pub company_name: String,
    pub industry: String,
    pub employee_count: u32,
    pub company_age_years: u32,
    pub file_format: String,
    pub is_annual_financial_data: bool,
    pub additional_notes: Option<String>,
}

/// Validate questionnaire answers and write the profile JSON.
pub fn cmd_profile(answers: &ProfileAnswers, output: &Path) -> Result<String, AstraError> {
    let industry = Industry::from_name(&answers.industry);
    if industry == Industry::Other && !answers.industry.trim().eq_ignore_ascii_case("other") {
        warn!(industry = %answers.industry, "Unknown industry, recorded as other");
    }
    let file_format: FileFormat = answers.file_format.parse()?;

    let profile = CompanyProfile::new(
        answers.company_name.as_str(),
        industry,
        answers.employee_count,
        answers.company_age_years,
        file_format,
        answers.is_annual_financial_data,
        answers.additional_notes.clone(),
    )?;
    profile.save(output)?;

    info!(company = %profile.company_name(), path = %output.display(), "Profile saved");
    Ok(format!(
        "Saved profile for {} to {}",
        profile.company_name(),
        output.display()
    ))
}
