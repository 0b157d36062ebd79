//! Data-integrity checks for scraped listings.
//!
//! Every rule runs for every record; a record can carry several issues at once.

use crate::domain::{Issue, ListingRecord, ValidationResult};
use crate::store::Document;

/// Listings strictly above this price may omit the description.
pub const LUXURY_THRESHOLD_USD: f64 = 2_000_000.0;

/// Apply the checklist to one record.
pub fn validate(record: &ListingRecord) -> ValidationResult {
    let mut issues = Vec::new();

    if record.address.is_none() {
        issues.push(Issue::MissingAddress);
    }

    if record.price.is_none() {
        issues.push(Issue::MissingPrice);
    }

    if record.description.is_none() {
        if record.price_usd > LUXURY_THRESHOLD_USD {
            issues.push(Issue::DescriptionSkippedLuxury);
        } else {
            issues.push(Issue::MissingDescription);
        }
    }

    ValidationResult::from_issues(issues)
}

/// Case-insensitive substring match against any target. No targets matches all.
pub fn matches_targets(url: &str, targets: &[String]) -> bool {
    if targets.is_empty() {
        return true;
    }
    let url = url.to_lowercase();
    targets.iter().any(|t| url.contains(&t.to_lowercase()))
}

/// A listing paired with its verification outcome.
#[derive(Debug, Clone)]
pub struct Verified {
    pub record: ListingRecord,
    pub result: ValidationResult,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerificationSummary {
    pub fetched: usize,
    pub verified: usize,
    pub passed: usize,
    pub failed: usize,
}

/// Decode, filter by target URL, and validate.
pub fn verify_documents(documents: &[Document], targets: &[String]) -> Vec<Verified> {
    documents
        .iter()
        .map(ListingRecord::from_document)
        .filter(|record| matches_targets(record.url.as_deref().unwrap_or(""), targets))
        .map(|record| {
            let result = validate(&record);
            Verified { record, result }
        })
        .collect()
}

pub fn summarize(fetched: usize, verified: &[Verified]) -> VerificationSummary {
    let passed = verified.iter().filter(|v| v.result.passed()).count();
    VerificationSummary {
        fetched,
        verified: verified.len(),
        passed,
        failed: verified.len() - passed,
    }
}
