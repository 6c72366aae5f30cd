//! # Calculator Module
//!
//! Turns a [`KpiInput`] into benchmarked metrics.
//!
//! The calculator is a pure function of its input and the injected
//! [`BenchmarkManager`]. It never fails: sections that are missing are
//! replaced by fixed defaults, and every substitution is named in
//! [`KpiResults::defaulted`] so callers can surface it.
//!
//! Percent metrics carry percentages (`30.0` = 30%) and are compared with
//! the benchmark scaled by 100. The category summaries in [`KpiResults`]
//! carry fractions (`0.30`).

use crate::benchmark::{BenchmarkManager, DEFAULT_INDUSTRY, metric};
use crate::input::{EmployeeRecord, FinancialRecord, KpiInput, OperationalData};
use crate::{KpiCategory, KpiMetric, KpiStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// DEFAULTS
// =============================================================================

pub const DEFAULT_GROSS_MARGIN: f64 = 0.3;
pub const DEFAULT_OPERATING_MARGIN: f64 = 0.15;
pub const DEFAULT_NET_MARGIN: f64 = 0.1;
pub const DEFAULT_REVENUE_PER_EMPLOYEE: f64 = 250_000.0;
pub const DEFAULT_TURNOVER_RATE: f64 = 0.15;
pub const DEFAULT_TOTAL_EMPLOYEES: u64 = 50;
pub const DEFAULT_COST_EFFICIENCY_RATIO: f64 = 0.8;
pub const DEFAULT_PRODUCTIVITY_INDEX: f64 = 0.78;

/// Score reported when there is nothing benchmarked to score.
pub const DEFAULT_EFFICIENCY_SCORE: f64 = 75.0;

/// Metric display names.
pub mod names {
    pub const GROSS_MARGIN: &str = "Gross Margin";
    pub const OPERATING_MARGIN: &str = "Operating Margin";
    pub const NET_MARGIN: &str = "Net Margin";
    pub const REVENUE_PER_EMPLOYEE: &str = "Revenue per Employee";
    pub const ASSET_TURNOVER: &str = "Asset Turnover";
    pub const DEBT_TO_EQUITY: &str = "Debt to Equity Ratio";
    pub const RETURN_ON_ASSETS: &str = "Return on Assets (ROA)";
    pub const RETURN_ON_EQUITY: &str = "Return on Equity (ROE)";
    pub const TURNOVER_RATE: &str = "Turnover Rate";
    pub const TOTAL_EMPLOYEES: &str = "Total Employees";
    pub const COST_EFFICIENCY_RATIO: &str = "Cost Efficiency Ratio";
    pub const PRODUCTIVITY_INDEX: &str = "Productivity Index";
}

// =============================================================================
// RESULT TYPES
// =============================================================================

/// Financial summary, as fractions (except revenue per employee).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialKpis {
    pub gross_margin: f64,
    pub operating_margin: f64,
    pub net_margin: f64,
    pub revenue_per_employee: f64,
}

/// HR summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrKpis {
    pub turnover_rate: f64,
    pub total_employees: u64,
}

/// Operational summary, as fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalKpis {
    pub cost_efficiency_ratio: f64,
    pub productivity_index: f64,
}

/// A metric flagged for remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inefficiency {
    pub issue_type: String,
    pub kpi_name: String,
    pub current_value: f64,
    pub benchmark: f64,
    pub severity: KpiStatus,
    pub description: String,
    pub recommended_agent: String,
}

/// Everything [`KpiCalculator::calculate_all_kpis`] produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiResults {
    pub industry: String,
    pub financial: FinancialKpis,
    pub hr: HrKpis,
    pub operational: OperationalKpis,
    /// Detailed metrics: financial, then hr, then operational.
    pub metrics: Vec<KpiMetric>,
    pub inefficiencies: Vec<Inefficiency>,
    pub efficiency_score: f64,
    /// Summary fields filled with a default because the input lacked them,
    /// as `section.field`.
    pub defaulted: Vec<String>,
}

impl KpiResults {
    /// Metrics in one category, in calculation order.
    pub fn metrics_in(&self, category: KpiCategory) -> impl Iterator<Item = &KpiMetric> {
        self.metrics
            .iter()
            .filter(move |metric| metric.category() == category)
    }

    /// Look up a detailed metric by display name.
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<&KpiMetric> {
        self.metrics.iter().find(|metric| metric.name() == name)
    }
}

// =============================================================================
// CALCULATOR
// =============================================================================

/// KPI calculator over an injected benchmark table.
#[derive(Debug, Clone, Default)]
pub struct KpiCalculator {
    benchmarks: BenchmarkManager,
}

impl KpiCalculator {
    #[must_use]
    pub fn new(benchmarks: BenchmarkManager) -> Self {
        Self { benchmarks }
    }

    #[must_use]
    pub fn benchmarks(&self) -> &BenchmarkManager {
        &self.benchmarks
    }

    /// Margins, revenue per employee, and balance-sheet ratios.
    ///
    /// Nothing is computed without positive revenue. Each ratio is skipped
    /// when its inputs are missing or its denominator is not positive.
    #[must_use]
    pub fn calculate_financial_kpis(&self, data: &FinancialRecord, industry: &str) -> Vec<KpiMetric> {
        let mut kpis = Vec::new();
        let Some(revenue) = data.revenue.filter(|r| *r > 0.0) else {
            return kpis;
        };

        if let Some(gross_profit) = data.effective_gross_profit() {
            let value = gross_profit / revenue * 100.0;
            let benchmark = self.percent_benchmark(industry, metric::GROSS_MARGIN);
            kpis.push(self.metric(
                names::GROSS_MARGIN,
                KpiCategory::Financial,
                value,
                benchmark,
                true,
                format!("Gross profit margin: {value:.1}% vs {benchmark:.1}% benchmark"),
            ));
        }

        if let Some(operating_income) = data.effective_operating_income() {
            let value = operating_income / revenue * 100.0;
            let benchmark = self.percent_benchmark(industry, metric::OPERATING_MARGIN);
            kpis.push(self.metric(
                names::OPERATING_MARGIN,
                KpiCategory::Financial,
                value,
                benchmark,
                true,
                format!("Operating profit margin: {value:.1}% vs {benchmark:.1}% benchmark"),
            ));
        }

        if let Some(net_income) = data.net_income {
            let value = net_income / revenue * 100.0;
            let benchmark = self.percent_benchmark(industry, metric::NET_MARGIN);
            kpis.push(self.metric(
                names::NET_MARGIN,
                KpiCategory::Financial,
                value,
                benchmark,
                true,
                format!("Net profit margin: {value:.1}% vs {benchmark:.1}% benchmark"),
            ));
        }

        if let Some(employees) = data.employee_count.filter(|n| *n > 0.0) {
            let value = revenue / employees;
            let benchmark = self
                .benchmarks
                .get_benchmark(industry, metric::REVENUE_PER_EMPLOYEE);
            kpis.push(self.metric(
                names::REVENUE_PER_EMPLOYEE,
                KpiCategory::Financial,
                value,
                benchmark,
                true,
                format!(
                    "Revenue per employee: ${} vs ${} benchmark",
                    group_thousands(value),
                    group_thousands(benchmark)
                ),
            ));
        }

        if let Some(assets) = data.total_assets.filter(|a| *a > 0.0) {
            let value = revenue / assets;
            let benchmark = self.benchmarks.get_benchmark(industry, metric::ASSET_TURNOVER);
            kpis.push(self.metric(
                names::ASSET_TURNOVER,
                KpiCategory::Financial,
                value,
                benchmark,
                true,
                format!("Asset turnover: {value:.2} vs {benchmark:.2} benchmark"),
            ));
        }

        let equity = data.total_equity.filter(|e| *e > 0.0);

        if let (Some(equity), Some(liabilities)) = (equity, data.total_liabilities) {
            let value = liabilities / equity;
            let benchmark = self.benchmarks.get_benchmark(industry, metric::DEBT_TO_EQUITY);
            kpis.push(self.metric(
                names::DEBT_TO_EQUITY,
                KpiCategory::Financial,
                value,
                benchmark,
                false,
                format!("Debt to equity ratio: {value:.2} vs {benchmark:.2} benchmark"),
            ));
        }

        if let Some(net_income) = data.net_income {
            if let Some(assets) = data.total_assets.filter(|a| *a > 0.0) {
                let value = net_income / assets * 100.0;
                let benchmark = self.percent_benchmark(industry, metric::RETURN_ON_ASSETS);
                kpis.push(self.metric(
                    names::RETURN_ON_ASSETS,
                    KpiCategory::Financial,
                    value,
                    benchmark,
                    true,
                    format!("Return on assets: {value:.1}% vs {benchmark:.1}% benchmark"),
                ));
            }

            if let Some(equity) = equity {
                let value = net_income / equity * 100.0;
                let benchmark = self.percent_benchmark(industry, metric::RETURN_ON_EQUITY);
                kpis.push(self.metric(
                    names::RETURN_ON_EQUITY,
                    KpiCategory::Financial,
                    value,
                    benchmark,
                    true,
                    format!("Return on equity: {value:.1}% vs {benchmark:.1}% benchmark"),
                ));
            }
        }

        kpis
    }

    /// Turnover and headcount from a roster.
    ///
    /// An employee counts as turned over when the roster carries a
    /// termination date for them. Departments get their own turnover rate,
    /// in name order. An empty roster yields nothing.
    #[must_use]
    pub fn calculate_hr_kpis(&self, records: &[EmployeeRecord], industry: &str) -> Vec<KpiMetric> {
        let mut kpis = Vec::new();
        if records.is_empty() {
            return kpis;
        }

        let benchmark = self.percent_benchmark(industry, metric::TURNOVER_RATE);
        let turnover = turnover_rate(records.iter());
        kpis.push(self.metric(
            names::TURNOVER_RATE,
            KpiCategory::Hr,
            turnover,
            benchmark,
            false,
            format!("Annual turnover rate: {turnover:.1}% vs {benchmark:.1}% benchmark"),
        ));

        let headcount = records.len() as f64;
        kpis.push(self.metric(
            names::TOTAL_EMPLOYEES,
            KpiCategory::Hr,
            headcount,
            0.0,
            true,
            format!("Employees on roster: {}", records.len()),
        ));

        let mut by_department: BTreeMap<&str, Vec<&EmployeeRecord>> = BTreeMap::new();
        for record in records {
            if let Some(department) = record.department.as_deref().map(str::trim) {
                if !department.is_empty() {
                    by_department.entry(department).or_default().push(record);
                }
            }
        }

        for (department, members) in by_department {
            let rate = turnover_rate(members.into_iter());
            kpis.push(self.metric(
                format!("{department} {}", names::TURNOVER_RATE),
                KpiCategory::Hr,
                rate,
                benchmark,
                false,
                format!("{department} department turnover: {rate:.1}%"),
            ));
        }

        kpis
    }

    /// Cost efficiency and productivity.
    #[must_use]
    pub fn calculate_operational_kpis(
        &self,
        financial: &FinancialRecord,
        operational: &OperationalData,
        industry: &str,
    ) -> Vec<KpiMetric> {
        let mut kpis = Vec::new();

        let revenue = financial.revenue.filter(|r| *r > 0.0);
        if let (Some(revenue), Some(opex)) = (revenue, financial.operating_expenses) {
            let value = opex / revenue * 100.0;
            let benchmark = self.percent_benchmark(industry, metric::COST_EFFICIENCY);
            kpis.push(self.metric(
                names::COST_EFFICIENCY_RATIO,
                KpiCategory::Operational,
                value,
                benchmark,
                false,
                format!("Operating expenses as % of revenue: {value:.1}% vs {benchmark:.1}% benchmark"),
            ));
        }

        if let Some(efficiency) = operational.process_efficiency {
            let value = efficiency * 100.0;
            let benchmark = self.percent_benchmark(industry, metric::PRODUCTIVITY_INDEX);
            kpis.push(self.metric(
                names::PRODUCTIVITY_INDEX,
                KpiCategory::Operational,
                value,
                benchmark,
                true,
                format!("Process efficiency: {value:.1}% vs {benchmark:.1}% benchmark"),
            ));
        }

        kpis
    }

    /// Run every KPI path and assemble the summary.
    ///
    /// Never fails. Summary fields without input get the `DEFAULT_*` values
    /// and are listed in [`KpiResults::defaulted`].
    #[must_use]
    pub fn calculate_all_kpis(&self, input: &KpiInput) -> KpiResults {
        let industry = input
            .industry
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_INDUSTRY)
            .to_lowercase();

        let hr = &input.hr_data;
        let declared_headcount = hr
            .total_employees
            .or_else(|| (!hr.employees.is_empty()).then_some(hr.employees.len() as u64));

        let mut financial_data = input.financial_data.clone();
        if financial_data.employee_count.is_none() {
            financial_data.employee_count = declared_headcount.map(|n| n as f64);
        }

        let financial_kpis = self.calculate_financial_kpis(&financial_data, &industry);
        let hr_kpis = self.calculate_hr_kpis(&hr.employees, &industry);
        let operational_kpis =
            self.calculate_operational_kpis(&financial_data, &input.operational_data, &industry);

        let mut defaulted = Vec::new();
        let mut pick = |field: &str, found: Option<f64>, default: f64| {
            found.unwrap_or_else(|| {
                defaulted.push(field.to_string());
                default
            })
        };

        let percent = |kpis: &[KpiMetric], name: &str| find_value(kpis, name).map(|v| v / 100.0);

        let financial = FinancialKpis {
            gross_margin: pick(
                "financial.gross_margin",
                percent(&financial_kpis, names::GROSS_MARGIN),
                DEFAULT_GROSS_MARGIN,
            ),
            operating_margin: pick(
                "financial.operating_margin",
                percent(&financial_kpis, names::OPERATING_MARGIN),
                DEFAULT_OPERATING_MARGIN,
            ),
            net_margin: pick(
                "financial.net_margin",
                percent(&financial_kpis, names::NET_MARGIN),
                DEFAULT_NET_MARGIN,
            ),
            revenue_per_employee: pick(
                "financial.revenue_per_employee",
                find_value(&financial_kpis, names::REVENUE_PER_EMPLOYEE),
                DEFAULT_REVENUE_PER_EMPLOYEE,
            ),
        };

        let turnover_rate = pick(
            "hr.turnover_rate",
            percent(&hr_kpis, names::TURNOVER_RATE),
            DEFAULT_TURNOVER_RATE,
        );

        let operational = OperationalKpis {
            cost_efficiency_ratio: pick(
                "operational.cost_efficiency_ratio",
                percent(&operational_kpis, names::COST_EFFICIENCY_RATIO),
                DEFAULT_COST_EFFICIENCY_RATIO,
            ),
            productivity_index: pick(
                "operational.productivity_index",
                input.operational_data.process_efficiency,
                DEFAULT_PRODUCTIVITY_INDEX,
            ),
        };

        // A headcount declared only on the financial side still counts.
        let financial_headcount = input
            .financial_data
            .employee_count
            .filter(|n| n.is_finite() && *n > 0.0)
            .map(|n| n.round() as u64);
        let total_employees = declared_headcount.or(financial_headcount).unwrap_or_else(|| {
            defaulted.push("hr.total_employees".to_string());
            DEFAULT_TOTAL_EMPLOYEES
        });

        let metrics: Vec<KpiMetric> = financial_kpis
            .into_iter()
            .chain(hr_kpis)
            .chain(operational_kpis)
            .collect();
        let inefficiencies = self.identify_inefficiencies(&metrics);
        let efficiency_score = efficiency_score(&metrics);

        KpiResults {
            industry,
            financial,
            hr: HrKpis {
                turnover_rate,
                total_employees,
            },
            operational,
            metrics,
            inefficiencies,
            efficiency_score,
            defaulted,
        }
    }

    /// Metrics with `warning` or `critical` status, in input order, each
    /// mapped to the agent that owns its category.
    #[must_use]
    pub fn identify_inefficiencies(&self, metrics: &[KpiMetric]) -> Vec<Inefficiency> {
        metrics
            .iter()
            .filter(|metric| metric.status().is_inefficient())
            .map(|metric| Inefficiency {
                issue_type: metric.category().issue_type().to_string(),
                kpi_name: metric.name().to_string(),
                current_value: metric.value(),
                benchmark: metric.benchmark(),
                severity: metric.status(),
                description: metric.description().to_string(),
                recommended_agent: metric.category().recommended_agent().to_string(),
            })
            .collect()
    }

    /// A caller-defined metric classified with the standard buckets.
    #[must_use]
    pub fn calculate_custom_kpi(
        &self,
        name: impl Into<String>,
        value: f64,
        benchmark: f64,
        higher_is_better: bool,
        description: impl Into<String>,
    ) -> KpiMetric {
        self.metric(
            name,
            KpiCategory::General,
            value,
            benchmark,
            higher_is_better,
            description,
        )
    }

    fn metric(
        &self,
        name: impl Into<String>,
        category: KpiCategory,
        value: f64,
        benchmark: f64,
        higher_is_better: bool,
        description: impl Into<String>,
    ) -> KpiMetric {
        let status = BenchmarkManager::compare_to_benchmark(value, benchmark, higher_is_better);
        KpiMetric::new(name, category, value, benchmark, status, description)
    }

    fn percent_benchmark(&self, industry: &str, metric: &str) -> f64 {
        self.benchmarks.get_benchmark(industry, metric) * 100.0
    }
}

/// Mean status points over benchmarked metrics, to one decimal.
///
/// Metrics without a benchmark carry no signal and are left out. With
/// nothing left the score is [`DEFAULT_EFFICIENCY_SCORE`].
#[must_use]
pub fn efficiency_score(metrics: &[KpiMetric]) -> f64 {
    let points: Vec<f64> = metrics
        .iter()
        .filter(|metric| metric.has_benchmark())
        .map(|metric| metric.status().score_points())
        .collect();

    if points.is_empty() {
        return DEFAULT_EFFICIENCY_SCORE;
    }
    let mean = points.iter().sum::<f64>() / points.len() as f64;
    (mean * 10.0).round() / 10.0
}

fn turnover_rate<'a>(records: impl Iterator<Item = &'a EmployeeRecord>) -> f64 {
    let (total, terminated) = records.fold((0usize, 0usize), |(total, terminated), record| {
        (total + 1, terminated + usize::from(record.is_terminated()))
    });
    if total == 0 {
        0.0
    } else {
        terminated as f64 / total as f64 * 100.0
    }
}

fn find_value(kpis: &[KpiMetric], name: &str) -> Option<f64> {
    kpis.iter()
        .find(|metric| metric.name() == name)
        .map(KpiMetric::value)
}

/// `1234567.8` -> `1,234,568`.
fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}

// =============================================================================
// TESTS
// =============================================================================
