//! # Profile Module
//!
//! The company questionnaire, captured once per analysis.
//!
//! A [`CompanyProfile`] is validated on construction and on load and is
//! immutable afterwards. Its industry selects the benchmark set.

use crate::error::{AstraError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// =============================================================================
// INDUSTRY
// =============================================================================

/// Predefined industries offered by the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Manufacturing,
    Services,
    Retail,
    Healthcare,
    Technology,
    Finance,
    Construction,
    Agriculture,
    Education,
    Hospitality,
    Other,
}

impl Industry {
    pub const ALL: [Industry; 11] = [
        Industry::Manufacturing,
        Industry::Services,
        Industry::Retail,
        Industry::Healthcare,
        Industry::Technology,
        Industry::Finance,
        Industry::Construction,
        Industry::Agriculture,
        Industry::Education,
        Industry::Hospitality,
        Industry::Other,
    ];

    /// Lowercase name, also the benchmark table key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Industry::Manufacturing => "manufacturing",
            Industry::Services => "services",
            Industry::Retail => "retail",
            Industry::Healthcare => "healthcare",
            Industry::Technology => "technology",
            Industry::Finance => "finance",
            Industry::Construction => "construction",
            Industry::Agriculture => "agriculture",
            Industry::Education => "education",
            Industry::Hospitality => "hospitality",
            Industry::Other => "other",
        }
    }

    /// Case-insensitive lookup; anything unrecognized is [`Industry::Other`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let key = name.trim().to_ascii_lowercase();
        Industry::ALL
            .into_iter()
            .find(|industry| industry.as_str() == key)
            .unwrap_or(Industry::Other)
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Industry::from_name(s))
    }
}

impl<'de> Deserialize<'de> for Industry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Industry::from_name(&name))
    }
}

// =============================================================================
// FILE FORMAT
// =============================================================================

/// Format of the financial file the company will provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Excel,
    Pdf,
}

impl FromStr for FileFormat {
    type Err = AstraError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excel" | "xlsx" | "xls" => Ok(FileFormat::Excel),
            "pdf" => Ok(FileFormat::Pdf),
            other => Err(AstraError::Validation(format!(
                "File format must be 'excel' or 'pdf', got '{other}'"
            ))),
        }
    }
}

// =============================================================================
// COMPANY PROFILE
// =============================================================================

/// Validated questionnaire answers.
///
/// Every way of building one, [`new`](Self::new) or deserialization, goes
/// through the same normalization: the name is trimmed and blank notes are
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProfileRecord")]
pub struct CompanyProfile {
    company_name: String,
    industry: Industry,
    employee_count: u32,
    company_age_years: u32,
    file_format: FileFormat,
    is_annual_financial_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_notes: Option<String>,
}

impl CompanyProfile {
    /// Build and validate a profile.
    pub fn new(
        company_name: impl Into<String>,
        industry: Industry,
        employee_count: u32,
        company_age_years: u32,
        file_format: FileFormat,
        is_annual_financial_data: bool,
        additional_notes: Option<String>,
    ) -> Result<Self> {
        let profile = Self::from(ProfileRecord {
            company_name: company_name.into(),
            industry,
            employee_count,
            company_age_years,
            file_format,
            is_annual_financial_data,
            additional_notes,
        });
        profile.validate()?;
        Ok(profile)
    }

    /// Parse and validate a profile from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a profile saved with [`save`](Self::save).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write the profile as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Check the invariants enforced on construction.
    ///
    /// Needed when a profile arrives embedded in a larger document that was
    /// deserialized directly.
    pub fn validate(&self) -> Result<()> {
        if self.company_name.trim().is_empty() {
            return Err(AstraError::Validation(
                "Missing required field: Company Name".to_string(),
            ));
        }
        if self.employee_count == 0 {
            return Err(AstraError::Validation(
                "Employee count must be a positive number.".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    #[must_use]
    pub fn industry(&self) -> Industry {
        self.industry
    }

    #[must_use]
    pub fn employee_count(&self) -> u32 {
        self.employee_count
    }

    #[must_use]
    pub fn company_age_years(&self) -> u32 {
        self.company_age_years
    }

    #[must_use]
    pub fn file_format(&self) -> FileFormat {
        self.file_format
    }

    #[must_use]
    pub fn is_annual_financial_data(&self) -> bool {
        self.is_annual_financial_data
    }

    #[must_use]
    pub fn additional_notes(&self) -> Option<&str> {
        self.additional_notes.as_deref()
    }
}

/// Wire form of a profile, before normalization.
#[derive(Deserialize)]
struct ProfileRecord {
    company_name: String,
    industry: Industry,
    employee_count: u32,
    company_age_years: u32,
    file_format: FileFormat,
    is_annual_financial_data: bool,
    #[serde(default)]
    additional_notes: Option<String>,
}

impl From<ProfileRecord> for CompanyProfile {
    fn from(record: ProfileRecord) -> Self {
        Self {
            company_name: record.company_name.trim().to_string(),
            industry: record.industry,
            employee_count: record.employee_count,
            company_age_years: record.company_age_years,
            file_format: record.file_format,
            is_annual_financial_data: record.is_annual_financial_data,
            additional_notes: record
                .additional_notes
                .filter(|notes| !notes.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CompanyProfile {
        CompanyProfile::new(
            "Carmanfe SAS",
            Industry::Manufacturing,
            120,
            15,
            FileFormat::Excel,
            true,
            None,
        )
        .expect("valid profile")
    }

    #[test]
    fn industry_parse_is_case_insensitive() {
        assert_eq!("Retail".parse::<Industry>().ok(), Some(Industry::Retail));
        assert_eq!(" TECHNOLOGY ".parse::<Industry>().ok(), Some(Industry::Technology));
    }

    #[test]
    fn unknown_industry_is_other() {
        assert_eq!("mining".parse::<Industry>().ok(), Some(Industry::Other));
    }

    #[test]
    fn unknown_industry_deserializes_as_other() {
        let industry: Industry = serde_json::from_str("\"mining\"").expect("parse");
        assert_eq!(industry, Industry::Other);
    }

    #[test]
    fn file_format_parse() {
        assert_eq!("XLSX".parse::<FileFormat>().ok(), Some(FileFormat::Excel));
        assert!("csv".parse::<FileFormat>().is_err());
    }

    #[test]
    fn empty_name_is_rejected() {
        let result = CompanyProfile::new("  ", Industry::Retail, 10, 1, FileFormat::Pdf, false, None);
        assert!(matches!(result, Err(AstraError::Validation(_))));
    }

    #[test]
    fn zero_employees_is_rejected() {
        let result = CompanyProfile::new("Acme", Industry::Retail, 0, 1, FileFormat::Pdf, false, None);
        assert!(matches!(result, Err(AstraError::Validation(_))));
    }

    #[test]
    fn blank_notes_are_dropped() {
        let profile = CompanyProfile::new(
            "Acme",
            Industry::Retail,
            10,
            1,
            FileFormat::Pdf,
            false,
            Some("   ".to_string()),
        )
        .expect("valid profile");
        assert_eq!(profile.additional_notes(), None);
    }

    #[test]
    fn json_uses_questionnaire_field_names() {
        let json = sample().to_json().expect("serialize");
        assert!(json.contains("\"company_name\": \"Carmanfe SAS\""));
        assert!(json.contains("\"industry\": \"manufacturing\""));
        assert!(json.contains("\"is_annual_financial_data\": true"));
        assert!(!json.contains("additional_notes"));
    }

    #[test]
    fn from_json_validates() {
        let json = r#"{
            "company_name": "Acme",
            "industry": "retail",
            "employee_count": 0,
            "company_age_years": 3,
            "file_format": "pdf",
            "is_annual_financial_data": true
        }"#;
        assert!(CompanyProfile::from_json(json).is_err());
    }

    #[test]
    fn deserialization_normalizes_like_new() {
        let json = r#"{
            "company_name": "  Acme  ",
            "industry": "retail",
            "employee_count": 12,
            "company_age_years": 3,
            "file_format": "pdf",
            "is_annual_financial_data": true,
            "additional_notes": "   "
        }"#;
        let parsed: CompanyProfile = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.company_name(), "Acme");
        assert_eq!(parsed.additional_notes(), None);

        let built = CompanyProfile::new("Acme", Industry::Retail, 12, 3, FileFormat::Pdf, true, None)
            .expect("valid profile");
        assert_eq!(parsed, built);
    }

    #[test]
    fn whitespace_name_fails_validation_after_load() {
        let json = r#"{
            "company_name": "   ",
            "industry": "retail",
            "employee_count": 12,
            "company_age_years": 3,
            "file_format": "pdf",
            "is_annual_financial_data": true
        }"#;
        assert!(matches!(
            CompanyProfile::from_json(json),
            Err(AstraError::Validation(_))
        ));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("company_profile.json");
        let profile = sample();

        profile.save(&path).expect("save");
        let loaded = CompanyProfile::load(&path).expect("load");
        assert_eq!(loaded, profile);
    }
}
