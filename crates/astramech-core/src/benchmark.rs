//! # Benchmark Module
//!
//! Industry benchmark tables and status classification.
//!
//! A table maps a lowercase industry key to a flat set of metric thresholds.
//! The `default` entry is mandatory; lookups for unknown industries or
//! metrics fall back to it, and then to `0.0`. Absence never raises.
//!
//! Rates are stored as fractions (`0.30` = 30%). Revenue per employee is an
//! absolute currency amount.

use crate::KpiStatus;
use crate::error::{AstraError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// =============================================================================
// TYPES
// =============================================================================

/// Metric name -> threshold for a single industry.
pub type BenchmarkSet = BTreeMap<String, f64>;

/// Industry key -> benchmark set.
pub type BenchmarkTable = BTreeMap<String, BenchmarkSet>;

/// Key of the mandatory fallback entry.
pub const DEFAULT_INDUSTRY: &str = "default";

/// Ratio at or above which a metric is `excellent`.
pub const EXCELLENT_RATIO: f64 = 1.0;
/// Ratio at or above which a metric is `good`.
pub const GOOD_RATIO: f64 = 0.8;
/// Ratio at or above which a metric is `warning`. Below is `critical`.
pub const WARNING_RATIO: f64 = 0.6;

/// Where the active benchmark table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BenchmarkSource {
    /// The compiled-in table.
    Embedded,
    /// A configuration file that loaded cleanly.
    File(PathBuf),
    /// A configuration file was requested but could not be used.
    Fallback { path: PathBuf, reason: String },
}

// =============================================================================
// BENCHMARK MANAGER
// =============================================================================

/// Read-only benchmark lookups.
///
/// Constructed once and injected into whatever needs it; there is no global
/// instance.
#[derive(Debug, Clone)]
pub struct BenchmarkManager {
    benchmarks: BenchmarkTable,
    source: BenchmarkSource,
}

impl Default for BenchmarkManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkManager {
    /// Manager backed by the embedded default table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            benchmarks: default_table(),
            source: BenchmarkSource::Embedded,
        }
    }

    /// Manager backed by an injected table.
    ///
    /// Keys are lowercased. A missing `default` entry is filled from the
    /// embedded table so the lookup invariant holds.
    #[must_use]
    pub fn from_table(table: BenchmarkTable) -> Self {
        Self {
            benchmarks: normalize(table),
            source: BenchmarkSource::Embedded,
        }
    }

    /// Load a table from a `.toml`, `.yaml`/`.yml` or `.json` document.
    ///
    /// The format follows the extension; anything unrecognized is read as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let table: BenchmarkTable = match extension.as_deref() {
            Some("toml") => toml::from_str(&content)?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        validate_table(&table)?;

        Ok(Self {
            benchmarks: normalize(table),
            source: BenchmarkSource::File(path.to_path_buf()),
        })
    }

    /// Load from `path` if given, falling back to the embedded table.
    ///
    /// A missing, unreadable or invalid file is not an error; the returned
    /// manager's [`source`](Self::source) says what happened.
    #[must_use]
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::new();
        };

        if !path.exists() {
            return Self {
                benchmarks: default_table(),
                source: BenchmarkSource::Fallback {
                    path: path.to_path_buf(),
                    reason: "file not found".to_string(),
                },
            };
        }

        match Self::load(path) {
            Ok(manager) => manager,
            Err(e) => Self {
                benchmarks: default_table(),
                source: BenchmarkSource::Fallback {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                },
            },
        }
    }

    /// Where this table came from.
    #[must_use]
    pub fn source(&self) -> &BenchmarkSource {
        &self.source
    }

    /// Configured industry keys, including `default`.
    #[must_use]
    pub fn industries(&self) -> Vec<&str> {
        self.benchmarks.keys().map(String::as_str).collect()
    }

    /// Whether the table has an entry of its own for `industry`.
    #[must_use]
    pub fn has_industry(&self, industry: &str) -> bool {
        self.benchmarks.contains_key(&industry_key(industry))
    }

    /// Benchmark for `metric` in `industry`.
    ///
    /// Falls back to the `default` entry, then to `0.0`. A zero result means
    /// "no benchmark available", not a real threshold.
    #[must_use]
    pub fn get_benchmark(&self, industry: &str, metric: &str) -> f64 {
        let key = industry_key(industry);
        self.benchmarks
            .get(&key)
            .and_then(|set| set.get(metric))
            .or_else(|| self.default_set().and_then(|set| set.get(metric)))
            .copied()
            .unwrap_or(0.0)
    }

    /// Copy of the full benchmark set for `industry`, or of the default set.
    #[must_use]
    pub fn get_all_benchmarks(&self, industry: &str) -> BenchmarkSet {
        let key = industry_key(industry);
        self.benchmarks
            .get(&key)
            .or_else(|| self.default_set())
            .cloned()
            .unwrap_or_default()
    }

    /// Classify `value` against `benchmark`.
    ///
    /// `ratio = value / benchmark`, inverted when lower is better, bucketed
    /// at 1.0 / 0.8 / 0.6. A zero benchmark is always `good`. When lower is
    /// better and `value <= 0` nothing can beat it, so it is `excellent`.
    #[must_use]
    pub fn compare_to_benchmark(value: f64, benchmark: f64, higher_is_better: bool) -> KpiStatus {
        if benchmark == 0.0 {
            return KpiStatus::Good;
        }

        if higher_is_better {
            bucket(value, benchmark)
        } else if value <= 0.0 {
            KpiStatus::Excellent
        } else {
            bucket(benchmark, value)
        }
    }

    fn default_set(&self) -> Option<&BenchmarkSet> {
        self.benchmarks.get(DEFAULT_INDUSTRY)
    }
}

/// Bucket `actual / reference`.
///
/// For a positive reference the ratio is evaluated as products so the bucket
/// edges are exact (`actual >= 0.6 * reference` rather than a rounded quotient).
fn bucket(actual: f64, reference: f64) -> KpiStatus {
    let at_least = |threshold: f64| {
        if reference > 0.0 {
            actual >= threshold * reference
        } else {
            actual / reference >= threshold
        }
    };

    if at_least(EXCELLENT_RATIO) {
        KpiStatus::Excellent
    } else if at_least(GOOD_RATIO) {
        KpiStatus::Good
    } else if at_least(WARNING_RATIO) {
        KpiStatus::Warning
    } else {
        KpiStatus::Critical
    }
}

fn industry_key(industry: &str) -> String {
    let key = industry.trim().to_lowercase();
    if key.is_empty() {
        DEFAULT_INDUSTRY.to_string()
    } else {
        key
    }
}

fn normalize(table: BenchmarkTable) -> BenchmarkTable {
    let mut normalized: BenchmarkTable = table
        .into_iter()
        .map(|(industry, set)| (industry_key(&industry), set))
        .collect();

    if !normalized.contains_key(DEFAULT_INDUSTRY) {
        let mut embedded = default_table();
        if let Some(set) = embedded.remove(DEFAULT_INDUSTRY) {
            normalized.insert(DEFAULT_INDUSTRY.to_string(), set);
        }
    }
    normalized
}

fn validate_table(table: &BenchmarkTable) -> Result<()> {
    for (industry, set) in table {
        for (metric, value) in set {
            if !value.is_finite() || *value < 0.0 {
                return Err(AstraError::Config(format!(
                    "benchmark {industry}.{metric} must be a finite non-negative number, got {value}"
                )));
            }
        }
    }
    Ok(())
}

// =============================================================================
// EMBEDDED DEFAULTS
// =============================================================================

/// Metric names understood by the calculator.
pub mod metric {
    pub const GROSS_MARGIN: &str = "gross_margin";
    pub const OPERATING_MARGIN: &str = "operating_margin";
    pub const NET_MARGIN: &str = "net_margin";
    pub const TURNOVER_RATE: &str = "turnover_rate";
    pub const PRODUCTIVITY_INDEX: &str = "productivity_index";
    pub const REVENUE_PER_EMPLOYEE: &str = "revenue_per_employee";
    pub const COST_EFFICIENCY: &str = "cost_efficiency";
    pub const ASSET_TURNOVER: &str = "asset_turnover";
    pub const DEBT_TO_EQUITY: &str = "debt_to_equity";
    pub const RETURN_ON_ASSETS: &str = "return_on_assets";
    pub const RETURN_ON_EQUITY: &str = "return_on_equity";
}

/// The compiled-in benchmark table.
///
/// Industries other than the core four only override what differs from
/// `default`; everything else falls through.
#[must_use]
pub fn default_table() -> BenchmarkTable {
    use crate::benchmark::metric::*;

    let entries: [(&str, &[(&str, f64)]); 11] = [
        (
            "technology",
            &[
                (GROSS_MARGIN, 0.40),
                (OPERATING_MARGIN, 0.15),
                (NET_MARGIN, 0.10),
                (TURNOVER_RATE, 0.15),
                (PRODUCTIVITY_INDEX, 0.85),
                (REVENUE_PER_EMPLOYEE, 500_000.0),
                (COST_EFFICIENCY, 0.75),
                (ASSET_TURNOVER, 1.0),
                (DEBT_TO_EQUITY, 0.3),
            ],
        ),
        (
            "manufacturing",
            &[
                (GROSS_MARGIN, 0.25),
                (OPERATING_MARGIN, 0.12),
                (NET_MARGIN, 0.08),
                (TURNOVER_RATE, 0.12),
                (PRODUCTIVITY_INDEX, 0.75),
                (REVENUE_PER_EMPLOYEE, 250_000.0),
                (COST_EFFICIENCY, 0.80),
                (ASSET_TURNOVER, 1.2),
                (DEBT_TO_EQUITY, 0.6),
            ],
        ),
        (
            "retail",
            &[
                (GROSS_MARGIN, 0.30),
                (OPERATING_MARGIN, 0.08),
                (NET_MARGIN, 0.05),
                (TURNOVER_RATE, 0.15),
                (PRODUCTIVITY_INDEX, 0.70),
                (REVENUE_PER_EMPLOYEE, 200_000.0),
                (COST_EFFICIENCY, 0.85),
                (ASSET_TURNOVER, 2.0),
                (DEBT_TO_EQUITY, 0.8),
            ],
        ),
        (
            "services",
            &[
                (GROSS_MARGIN, 0.40),
                (OPERATING_MARGIN, 0.15),
                (NET_MARGIN, 0.10),
                (TURNOVER_RATE, 0.18),
                (PRODUCTIVITY_INDEX, 0.80),
                (REVENUE_PER_EMPLOYEE, 300_000.0),
                (COST_EFFICIENCY, 0.75),
                (ASSET_TURNOVER, 1.5),
                (DEBT_TO_EQUITY, 0.4),
            ],
        ),
        (
            "healthcare",
            &[
                (GROSS_MARGIN, 0.50),
                (OPERATING_MARGIN, 0.18),
                (NET_MARGIN, 0.12),
                (REVENUE_PER_EMPLOYEE, 400_000.0),
                (ASSET_TURNOVER, 1.3),
                (DEBT_TO_EQUITY, 0.5),
            ],
        ),
        (
            "finance",
            &[
                (GROSS_MARGIN, 0.60),
                (OPERATING_MARGIN, 0.20),
                (NET_MARGIN, 0.12),
                (REVENUE_PER_EMPLOYEE, 600_000.0),
                (ASSET_TURNOVER, 0.8),
                (DEBT_TO_EQUITY, 0.9),
            ],
        ),
        (
            "construction",
            &[
                (GROSS_MARGIN, 0.20),
                (OPERATING_MARGIN, 0.08),
                (NET_MARGIN, 0.05),
                (REVENUE_PER_EMPLOYEE, 180_000.0),
                (ASSET_TURNOVER, 1.5),
                (DEBT_TO_EQUITY, 0.7),
            ],
        ),
        (
            "agriculture",
            &[
                (GROSS_MARGIN, 0.25),
                (OPERATING_MARGIN, 0.10),
                (NET_MARGIN, 0.06),
                (REVENUE_PER_EMPLOYEE, 150_000.0),
                (ASSET_TURNOVER, 1.0),
                (DEBT_TO_EQUITY, 0.5),
            ],
        ),
        (
            "education",
            &[
                (GROSS_MARGIN, 0.35),
                (OPERATING_MARGIN, 0.12),
                (NET_MARGIN, 0.08),
                (REVENUE_PER_EMPLOYEE, 250_000.0),
                (ASSET_TURNOVER, 1.2),
                (DEBT_TO_EQUITY, 0.4),
            ],
        ),
        (
            "hospitality",
            &[
                (GROSS_MARGIN, 0.30),
                (OPERATING_MARGIN, 0.10),
                (NET_MARGIN, 0.06),
                (REVENUE_PER_EMPLOYEE, 120_000.0),
                (ASSET_TURNOVER, 1.8),
                (DEBT_TO_EQUITY, 0.6),
            ],
        ),
        (
            DEFAULT_INDUSTRY,
            &[
                (GROSS_MARGIN, 0.30),
                (OPERATING_MARGIN, 0.12),
                (NET_MARGIN, 0.08),
                (TURNOVER_RATE, 0.15),
                (PRODUCTIVITY_INDEX, 0.75),
                (REVENUE_PER_EMPLOYEE, 250_000.0),
                (COST_EFFICIENCY, 0.80),
                (ASSET_TURNOVER, 1.2),
                (DEBT_TO_EQUITY, 0.6),
                (RETURN_ON_ASSETS, 0.08),
                (RETURN_ON_EQUITY, 0.15),
            ],
        ),
    ];

    entries
        .into_iter()
        .map(|(industry, metrics)| {
            let set = metrics
                .iter()
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect();
            (industry.to_string(), set)
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
