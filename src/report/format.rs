//! Formatted terminal output.
//!
//! Everything here returns a `String`; the caller decides where it goes.

use crate::audit::DuplicateUrl;
use crate::cleanup::{DrainReport, DrainStop};
use crate::domain::{BatchStatus, ListingRecord, ValidationResult};
use crate::verify::VerificationSummary;

const DESCRIPTION_PREVIEW_CHARS: usize = 50;
const ADDRESS_COLUMN_CHARS: usize = 30;

/// One verification block for a listing.
pub fn format_verification(record: &ListingRecord, result: &ValidationResult) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n[{}] {}\n",
        result.status.label(),
        record.url.as_deref().unwrap_or("")
    ));
    out.push_str(&format!(
        "  Price: {} (${})\n",
        record.price.as_deref().unwrap_or("None"),
        record.price_usd
    ));
    out.push_str(&format!(
        "  Address: {}\n",
        record.address.as_deref().unwrap_or("None")
    ));
    match record.description.as_deref() {
        Some(desc) => out.push_str(&format!(
            "  Description: {}...\n",
            take_chars(desc, DESCRIPTION_PREVIEW_CHARS)
        )),
        None => out.push_str("  Description: None\n"),
    }
    if !result.issues.is_empty() {
        out.push_str(&format!("  ⚠️ Issues: {}\n", result.issue_labels().join(", ")));
    }

    out
}

pub fn format_verification_summary(summary: &VerificationSummary) -> String {
    format!(
        "\nVerified {} of {} listings: {} passed, {} failed.",
        summary.verified, summary.fetched, summary.passed, summary.failed
    )
}

/// Fixed-width listing dump.
pub fn format_listing_table(records: &[ListingRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<15} | {:<15} | {:<10} | {:<30} | {}\n",
        "ID", "Distance (TSMC)", "Price", "Address", "URL"
    ));
    out.push_str(&"-".repeat(100));
    out.push('\n');

    for r in records {
        let distance = r
            .tsmc_distance_miles
            .map(|d| d.to_string())
            .unwrap_or_else(|| "NULL".to_string());
        out.push_str(
            format!(
                "{:<15} | {:<15} | {:<10} | {:<30} | {}\n",
                r.id,
                distance,
                r.price.as_deref().unwrap_or("N/A"),
                take_chars(r.address.as_deref().unwrap_or("N/A"), ADDRESS_COLUMN_CHARS),
                r.url.as_deref().unwrap_or(""),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

pub fn format_duplicates(duplicates: &[DuplicateUrl]) -> String {
    if duplicates.is_empty() {
        return "No duplicate URLs found.\n".to_string();
    }
    let mut out = format!("Found {} duplicate URLs:\n", duplicates.len());
    for d in duplicates {
        out.push_str(&format!("  ({} times): {}\n", d.count, d.url));
    }
    out
}

pub fn format_batch_statuses(batches: &[BatchStatus]) -> String {
    let mut out = String::new();
    for b in batches {
        let date = b.started_at_display();
        out.push_str(&format!(
            "Batch ID: {} | Date: {} | Status: {} | Progress: {}/{}\n",
            b.id,
            date,
            b.current_status.as_deref().unwrap_or("N/A"),
            b.completed,
            b.total
        ));
    }
    out
}

pub fn format_drain_report(report: &DrainReport) -> String {
    let mut out = format!(
        "Total deleted from {}: {}",
        report.collection, report.deleted
    );
    if report.already_gone > 0 {
        out.push_str(&format!(" ({} already gone)", report.already_gone));
    }
    if report.failed > 0 {
        out.push_str(&format!(", {} failed", report.failed));
    }
    let note = match report.stop {
        DrainStop::Empty => None,
        DrainStop::RoundLimit => Some(format!(
            "stopped after {} rounds with documents remaining",
            report.rounds
        )),
        DrainStop::NoProgress => Some("stopped: no document on the last page could be deleted".to_string()),
        DrainStop::ListFailed => Some("stopped: could not list the collection".to_string()),
    };
    if let Some(note) = note {
        out.push_str(&format!("\n  ⚠️ Incomplete: {note}"));
    }
    out
}

fn take_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
