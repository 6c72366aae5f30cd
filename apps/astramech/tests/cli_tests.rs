//! Integration tests for AstraMech CLI commands.
//!
//! Uses tempfile for testing file-based operations.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use astramech::cli::{
    ProfileAnswers, cmd_analyze, cmd_benchmarks, cmd_compare, cmd_profile, describe_source,
    load_input,
};
use astramech_core::{
    AnalysisResult, AstraError, BenchmarkManager, BenchmarkSource, CompanyProfile, Industry,
    KpiCalculator, KpiResults, KpiStatus,
};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a temporary directory for tests.
fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// A technology company with strong margins, weak net income, and one
/// leaver in Sales.
fn create_input_json(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("input.json");
    let content = r#"{
        "industry": "technology",
        "financial_data": {
            "revenue": 1000000,
            "cogs": 500000,
            "operating_expenses": 300000,
            "net_income": 50000,
            "employee_count": 4
        },
        "hr_data": {
            "employees": [
                {"employeeNumber": "E1", "department": "Sales"},
                {"employeeNumber": "E2", "department": "Sales", "terminationDate": "2024-01-15"},
                {"employeeNumber": "E3", "department": "Ops"},
                {"employeeNumber": "E4", "department": "Ops"},
                {"employeeNumber": "E5", "department": "Ops"}
            ]
        },
        "operational_data": {"process_efficiency": 0.9}
    }"#;
    std::fs::write(&path, content).unwrap();
    path
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn calculator() -> KpiCalculator {
    KpiCalculator::new(BenchmarkManager::new())
}

// =============================================================================
// LOAD INPUT TESTS
// =============================================================================

#[test]
fn test_load_input_reads_camel_case_roster() {
    let temp = create_temp_dir();
    let path = create_input_json(&temp);

    let input = load_input(&path).unwrap();
    assert_eq!(input.hr_data.employees.len(), 5);
    assert!(input.hr_data.employees[1].is_terminated());
    assert_eq!(input.industry.as_deref(), Some("technology"));
}

#[test]
fn test_load_input_rejects_negative_revenue() {
    let temp = create_temp_dir();
    let path = write_file(&temp, "bad.json", r#"{"financial_data": {"revenue": -5}}"#);

    let result = load_input(&path);
    assert!(matches!(result, Err(AstraError::Validation(_))));
}

#[test]
fn test_load_input_rejects_malformed_json() {
    let temp = create_temp_dir();
    let path = write_file(&temp, "bad.json", "{ not json");

    assert!(matches!(load_input(&path), Err(AstraError::Json(_))));
}

#[test]
fn test_load_input_missing_file() {
    let temp = create_temp_dir();
    let result = load_input(&temp.path().join("absent.json"));
    assert!(matches!(result, Err(AstraError::Io(_))));
}

// =============================================================================
// ANALYZE COMMAND TESTS
// =============================================================================

#[test]
fn test_analyze_json_output() {
    let temp = create_temp_dir();
    let input = create_input_json(&temp);

    let output = cmd_analyze(&calculator(), &input, None, true).unwrap();
    let results: KpiResults = serde_json::from_str(&output).unwrap();

    assert_eq!(results.industry, "technology");
    assert_eq!(results.hr.total_employees, 5);
    assert!((results.financial.gross_margin - 0.5).abs() < 1e-9);
    assert!((results.financial.revenue_per_employee - 250_000.0).abs() < 1e-9);
    assert!((results.hr.turnover_rate - 0.2).abs() < 1e-9);
    assert!(results.defaulted.is_empty());

    let flagged: Vec<&str> = results
        .inefficiencies
        .iter()
        .map(|i| i.kpi_name.as_str())
        .collect();
    assert_eq!(
        flagged,
        vec!["Net Margin", "Revenue per Employee", "Turnover Rate", "Sales Turnover Rate"]
    );
    assert_eq!(results.efficiency_score, 67.8);
}

#[test]
fn test_analyze_department_statuses() {
    let temp = create_temp_dir();
    let input = create_input_json(&temp);

    let output = cmd_analyze(&calculator(), &input, None, true).unwrap();
    let results: KpiResults = serde_json::from_str(&output).unwrap();

    let status = |name: &str| results.metric(name).map(|m| m.status());
    assert_eq!(status("Ops Turnover Rate"), Some(KpiStatus::Excellent));
    assert_eq!(status("Sales Turnover Rate"), Some(KpiStatus::Critical));
    assert_eq!(status("Total Employees"), Some(KpiStatus::Good));
}

#[test]
fn test_analyze_text_output() {
    let temp = create_temp_dir();
    let input = create_input_json(&temp);

    let output = cmd_analyze(&calculator(), &input, None, false).unwrap();
    assert!(output.contains("Industry: technology"));
    assert!(output.contains("Efficiency score: 67.8 / 100"));
    assert!(output.contains("KPI ANALYSIS REPORT"));
    assert!(output.contains("[critical] Net Margin -> financial_optimizer"));
    assert!(output.contains("[warning] Turnover Rate -> hr_optimizer"));
    assert!(!output.contains("Defaulted:"));
}

#[test]
fn test_analyze_empty_input_reports_defaults() {
    let temp = create_temp_dir();
    let input = write_file(&temp, "empty.json", "{}");

    let output = cmd_analyze(&calculator(), &input, None, false).unwrap();
    assert!(output.contains("Efficiency score: 75.0 / 100"));
    assert!(output.contains("No inefficiencies found."));
    assert!(output.contains("Defaulted: financial.gross_margin"));
}

#[test]
fn test_analyze_with_profile() {
    let temp = create_temp_dir();
    let input = write_file(
        &temp,
        "input.json",
        r#"{"industry": "retail", "financial_data": {"revenue": 4000000}}"#,
    );
    let profile_path = temp.path().join("profile.json");
    let answers = ProfileAnswers {
        company_name: "Acme Robotics".to_string(),
        industry: "Technology".to_string(),
        employee_count: 40,
        company_age_years: 6,
        file_format: "xlsx".to_string(),
        is_annual_financial_data: true,
        additional_notes: None,
    };
    cmd_profile(&answers, &profile_path).unwrap();

    let output = cmd_analyze(&calculator(), &input, Some(&profile_path), true).unwrap();
    let result: AnalysisResult = serde_json::from_str(&output).unwrap();

    assert_eq!(result.company_name, "Acme Robotics");
    assert_eq!(result.kpi_results.industry, "technology");
    assert_eq!(result.kpi_results.hr.total_employees, 40);
    assert!((result.kpi_results.financial.revenue_per_employee - 100_000.0).abs() < 1e-9);
}

#[test]
fn test_analyze_with_profile_text_output() {
    let temp = create_temp_dir();
    let input = create_input_json(&temp);
    let profile = CompanyProfile::new(
        "Northwind",
        Industry::Services,
        12,
        3,
        astramech_core::FileFormat::Pdf,
        false,
        None,
    )
    .unwrap();
    let profile_path = temp.path().join("profile.json");
    profile.save(&profile_path).unwrap();

    let output = cmd_analyze(&calculator(), &input, Some(&profile_path), false).unwrap();
    assert!(output.starts_with("Company: Northwind (services, 12 employees, 3 years)"));
    assert!(output.contains("Industry: services"));
}

#[test]
fn test_analyze_missing_profile_fails() {
    let temp = create_temp_dir();
    let input = create_input_json(&temp);
    let missing = temp.path().join("nope.json");

    assert!(cmd_analyze(&calculator(), &input, Some(&missing), false).is_err());
}

// =============================================================================
// BENCHMARKS COMMAND TESTS
// =============================================================================

#[test]
fn test_benchmarks_lists_industries() {
    let manager = BenchmarkManager::new();
    let output = cmd_benchmarks(&manager, None, false).unwrap();

    assert!(output.starts_with("Source: embedded"));
    for name in ["default", "manufacturing", "retail", "services", "technology"] {
        assert!(output.contains(name), "missing {name}");
    }
}

#[test]
fn test_benchmarks_for_industry_json() {
    let manager = BenchmarkManager::new();
    let output = cmd_benchmarks(&manager, Some("retail"), true).unwrap();
    let set: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(set["gross_margin"], 0.30);
    assert_eq!(set["asset_turnover"], 2.0);
}

#[test]
fn test_benchmarks_unknown_industry_uses_default() {
    let manager = BenchmarkManager::new();
    let output = cmd_benchmarks(&manager, Some("space mining"), false).unwrap();

    assert!(output.contains("(not listed, using default)"));
    assert!(output.contains("revenue_per_employee"));
}

#[test]
fn test_benchmarks_from_file() {
    let temp = create_temp_dir();
    let path = write_file(
        &temp,
        "bench.toml",
        "[mining]\ngross_margin = 0.22\n\n[default]\ngross_margin = 0.3\n",
    );
    let manager = BenchmarkManager::load(&path).unwrap();

    let output = cmd_benchmarks(&manager, None, true).unwrap();
    let industries: Vec<String> = serde_json::from_str(&output).unwrap();
    assert!(industries.contains(&"mining".to_string()));
    assert_eq!(describe_source(manager.source()), path.display().to_string());
}

#[test]
fn test_benchmarks_fallback_is_described() {
    let temp = create_temp_dir();
    let path = write_file(&temp, "bench.json", "{ broken");
    let manager = BenchmarkManager::load_or_default(Some(&path));

    assert!(matches!(manager.source(), BenchmarkSource::Fallback { .. }));
    assert!(describe_source(manager.source()).starts_with("embedded (fallback from"));
}

// =============================================================================
// COMPARE COMMAND TESTS
// =============================================================================

#[test]
fn test_compare_higher_is_better() {
    assert_eq!(cmd_compare(100.0, 100.0, false).unwrap(), "excellent");
    assert_eq!(cmd_compare(85.0, 100.0, false).unwrap(), "good");
    assert_eq!(cmd_compare(70.0, 100.0, false).unwrap(), "warning");
    assert_eq!(cmd_compare(10.0, 100.0, false).unwrap(), "critical");
}

#[test]
fn test_compare_lower_is_better() {
    assert_eq!(cmd_compare(10.0, 15.0, true).unwrap(), "excellent");
    assert_eq!(cmd_compare(20.0, 15.0, true).unwrap(), "warning");
    assert_eq!(cmd_compare(0.0, 15.0, true).unwrap(), "excellent");
}

#[test]
fn test_compare_zero_benchmark_is_good() {
    assert_eq!(cmd_compare(-3.0, 0.0, false).unwrap(), "good");
}

#[test]
fn test_compare_rejects_nan() {
    assert!(matches!(
        cmd_compare(f64::NAN, 1.0, false),
        Err(AstraError::Validation(_))
    ));
}

// =============================================================================
// PROFILE COMMAND TESTS
// =============================================================================

fn answers() -> ProfileAnswers {
    ProfileAnswers {
        company_name: "  Acme  ".to_string(),
        industry: "manufacturing".to_string(),
        employee_count: 120,
        company_age_years: 15,
        file_format: "pdf".to_string(),
        is_annual_financial_data: false,
        additional_notes: Some("   ".to_string()),
    }
}

#[test]
fn test_profile_writes_trimmed_profile() {
    let temp = create_temp_dir();
    let path = temp.path().join("profile.json");

    let message = cmd_profile(&answers(), &path).unwrap();
    assert!(message.contains("Acme"));

    let profile = CompanyProfile::load(&path).unwrap();
    assert_eq!(profile.company_name(), "Acme");
    assert_eq!(profile.industry(), Industry::Manufacturing);
    assert!(!profile.is_annual_financial_data());
    assert_eq!(profile.additional_notes(), None);
}

#[test]
fn test_profile_rejects_zero_employees() {
    let temp = create_temp_dir();
    let path = temp.path().join("profile.json");
    let mut bad = answers();
    bad.employee_count = 0;

    assert!(matches!(cmd_profile(&bad, &path), Err(AstraError::Validation(_))));
    assert!(!path.exists());
}

#[test]
fn test_profile_rejects_unknown_format() {
    let temp = create_temp_dir();
    let path = temp.path().join("profile.json");
    let mut bad = answers();
    bad.file_format = "csv".to_string();

    assert!(matches!(cmd_profile(&bad, &path), Err(AstraError::Validation(_))));
}

#[test]
fn test_profile_unknown_industry_is_other() {
    let temp = create_temp_dir();
    let path = temp.path().join("profile.json");
    let mut odd = answers();
    odd.industry = "Space Mining".to_string();

    cmd_profile(&odd, &path).unwrap();
    assert_eq!(CompanyProfile::load(&path).unwrap().industry(), Industry::Other);
}
