//! # AstraMech Library
//!
//! This library exposes the AstraMech application modules for testing and
//! integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;
pub mod config;

// Re-export astramech_core for convenience
pub use astramech_core;

use astramech_core::KpiResults;

/// Warn about summary fields the calculator had to default.
pub fn warn_defaulted(results: &KpiResults) {
    if !results.defaulted.is_empty() {
        tracing::warn!(
            fields = %results.defaulted.join(", "),
            "Input lacked fields; industry defaults substituted"
        );
    }
}
