//! # Input Module
//!
//! The raw document the calculator consumes.
//!
//! Every section and every field is optional. Missing data is handled by
//! the calculator, which substitutes documented defaults instead of failing.

use crate::error::{AstraError, Result};
use serde::{Deserialize, Serialize};

/// Complete KPI computation input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiInput {
    /// Industry used for benchmark lookups. `None` means `default`.
    pub industry: Option<String>,
    pub financial_data: FinancialRecord,
    pub hr_data: HrData,
    pub operational_data: OperationalData,
}

impl KpiInput {
    /// Validate the numeric sections before computing.
    pub fn validate(&self) -> Result<()> {
        self.financial_data.validate()?;
        self.operational_data.validate()
    }
}

/// Flat financial figures for one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialRecord {
    pub revenue: Option<f64>,
    #[serde(alias = "cost_of_goods_sold")]
    pub cogs: Option<f64>,
    pub gross_profit: Option<f64>,
    pub operating_expenses: Option<f64>,
    pub operating_income: Option<f64>,
    pub net_income: Option<f64>,
    pub employee_count: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub total_equity: Option<f64>,
}

impl FinancialRecord {
    /// Whether no figure at all was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Reject figures that cannot be meaningful.
    ///
    /// Revenue, cost of goods sold, operating expenses, employee count and
    /// asset/liability totals cannot be negative. Income figures may be.
    /// Nothing may be NaN or infinite.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("revenue", self.revenue),
            ("cost_of_goods_sold", self.cogs),
            ("operating_expenses", self.operating_expenses),
            ("employee_count", self.employee_count),
            ("total_assets", self.total_assets),
            ("total_liabilities", self.total_liabilities),
        ];
        let signed = [
            ("gross_profit", self.gross_profit),
            ("operating_income", self.operating_income),
            ("net_income", self.net_income),
            ("total_equity", self.total_equity),
        ];

        for (field, value) in non_negative.iter().chain(signed.iter()) {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(AstraError::Validation(format!(
                        "Invalid financial data: {} must be a finite number",
                        field_label(field)
                    )));
                }
            }
        }

        for (field, value) in non_negative {
            if value.is_some_and(|v| v < 0.0) {
                return Err(AstraError::Validation(format!(
                    "Invalid financial data: {} cannot be negative",
                    field_label(field)
                )));
            }
        }
        Ok(())
    }

    /// Operating income, derived from revenue minus costs when not given.
    #[must_use]
    pub fn effective_operating_income(&self) -> Option<f64> {
        self.operating_income.or_else(|| {
            let revenue = self.revenue?;
            let cogs = self.cogs?;
            let opex = self.operating_expenses?;
            Some(revenue - cogs - opex)
        })
    }

    /// Gross profit, from revenue minus cost of goods sold when available.
    #[must_use]
    pub fn effective_gross_profit(&self) -> Option<f64> {
        match (self.revenue, self.cogs) {
            (Some(revenue), Some(cogs)) => Some(revenue - cogs),
            _ => self.gross_profit,
        }
    }
}

/// One row of an HR roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(default, alias = "employeeNumber")]
    pub employee_number: Option<String>,
    #[serde(default, alias = "terminationDate")]
    pub termination_date: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl EmployeeRecord {
    /// Record for an employee still on staff.
    #[must_use]
    pub fn active(department: impl Into<String>) -> Self {
        Self {
            employee_number: None,
            termination_date: None,
            department: Some(department.into()),
        }
    }

    /// Record for an employee who left on `date`.
    #[must_use]
    pub fn terminated(department: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            employee_number: None,
            termination_date: Some(date.into()),
            department: Some(department.into()),
        }
    }

    /// Whether the roster shows a termination for this employee.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.termination_date
            .as_deref()
            .is_some_and(|date| !date.trim().is_empty())
    }
}

/// HR section: a declared headcount and/or a roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HrData {
    pub total_employees: Option<u64>,
    pub employees: Vec<EmployeeRecord>,
}

/// Operational section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationalData {
    /// Share of process output delivered as planned (0.0..=1.0).
    pub process_efficiency: Option<f64>,
}

impl OperationalData {
    pub fn validate(&self) -> Result<()> {
        match self.process_efficiency {
            Some(v) if !v.is_finite() || v < 0.0 => Err(AstraError::Validation(
                "Invalid operational data: Process Efficiency must be a non-negative number"
                    .to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// `operating_expenses` -> `Operating Expenses`.
fn field_label(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_parses() {
        let input: KpiInput = serde_json::from_str("{}").expect("parse");
        assert_eq!(input, KpiInput::default());
        assert!(input.financial_data.is_empty());
    }

    #[test]
    fn cogs_alias_is_accepted() {
        let record: FinancialRecord =
            serde_json::from_str(r#"{"revenue": 100.0, "cost_of_goods_sold": 60}"#).expect("parse");
        assert_eq!(record.cogs, Some(60.0));
    }

    #[test]
    fn roster_accepts_camel_case_columns() {
        let hr: HrData = serde_json::from_str(
            r#"{"employees": [{"employeeNumber": "7", "terminationDate": "2024-01-01"}]}"#,
        )
        .expect("parse");
        assert_eq!(hr.employees.len(), 1);
        assert!(hr.employees[0].is_terminated());
    }

    #[test]
    fn blank_termination_date_is_not_a_termination() {
        let record = EmployeeRecord {
            termination_date: Some("  ".to_string()),
            ..EmployeeRecord::default()
        };
        assert!(!record.is_terminated());
    }

    #[test]
    fn negative_revenue_is_rejected() {
        let record = FinancialRecord {
            revenue: Some(-1.0),
            ..FinancialRecord::default()
        };
        let err = record.validate().expect_err("negative revenue");
        assert!(err.to_string().contains("Revenue cannot be negative"));
    }

    #[test]
    fn negative_net_income_is_allowed() {
        let record = FinancialRecord {
            revenue: Some(100.0),
            net_income: Some(-20.0),
            ..FinancialRecord::default()
        };
        assert!(record.validate().is_ok());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let record = FinancialRecord {
            net_income: Some(f64::INFINITY),
            ..FinancialRecord::default()
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn operating_income_is_derived_from_costs() {
        let record = FinancialRecord {
            revenue: Some(1_000.0),
            cogs: Some(600.0),
            operating_expenses: Some(200.0),
            ..FinancialRecord::default()
        };
        assert_eq!(record.effective_operating_income(), Some(200.0));
    }

    #[test]
    fn gross_profit_prefers_revenue_minus_cogs() {
        let record = FinancialRecord {
            revenue: Some(1_000.0),
            cogs: Some(700.0),
            gross_profit: Some(1.0),
            ..FinancialRecord::default()
        };
        assert_eq!(record.effective_gross_profit(), Some(300.0));
    }

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(field_label("cost_of_goods_sold"), "Cost Of Goods Sold");
    }
}
