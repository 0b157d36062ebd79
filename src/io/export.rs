//! Export verification results to JSON.
//!
//! The file is meant for diffing runs or feeding a spreadsheet import.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Issue, ValidationStatus};
use crate::error::AppError;
use crate::verify::{VerificationSummary, Verified};

#[derive(Debug, Serialize)]
pub struct VerificationExport<'a> {
    pub tool: &'static str,
    pub generated_at: DateTime<Utc>,
    pub targets: &'a [String],
    pub fetched: usize,
    pub passed: usize,
    pub failed: usize,
    pub listings: Vec<ExportRow<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
    pub id: &'a str,
    pub url: Option<&'a str>,
    pub status: ValidationStatus,
    pub issues: &'a [Issue],
    pub price: Option<&'a str>,
    pub price_usd: f64,
    pub address: Option<&'a str>,
}

pub fn build_export<'a>(
    verified: &'a [Verified],
    summary: &VerificationSummary,
    targets: &'a [String],
    generated_at: DateTime<Utc>,
) -> VerificationExport<'a> {
    VerificationExport {
        tool: "listing-ops",
        generated_at,
        targets,
        fetched: summary.fetched,
        passed: summary.passed,
        failed: summary.failed,
        listings: verified
            .iter()
            .map(|v| ExportRow {
                id: &v.record.id,
                url: v.record.url.as_deref(),
                status: v.result.status,
                issues: &v.result.issues,
                price: v.record.price.as_deref(),
                price_usd: v.record.price_usd,
                address: v.record.address.as_deref(),
            })
            .collect(),
    }
}

/// Write verification results as pretty JSON.
pub fn write_verification_json(path: &Path, export: &VerificationExport<'_>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, export)
        .map_err(|e| AppError::io(format!("Failed to write export JSON: {e}")))?;

    Ok(())
}
