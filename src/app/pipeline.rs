//! Store-facing workflows shared by the subcommands.
//!
//! Each function takes the store as a trait object so the same flow runs
//! against Firestore in production and an in-memory store in tests. Printing is
//! left to `app`.

use crate::audit::{DuplicateUrl, find_duplicate_urls};
use crate::domain::{BatchStatus, ListingRecord};
use crate::monitor::{PriceDrop, detect_price_drops};
use crate::store::{DocumentStore, fetch_collection};
use crate::verify::{VerificationSummary, Verified, summarize, verify_documents};

pub const LISTINGS: &str = "listings";
pub const BATCH_STATUS: &str = "batch_status";

#[derive(Debug, Clone)]
pub struct AuditOutput {
    pub listings: Vec<ListingRecord>,
    pub duplicates: Vec<DuplicateUrl>,
    pub batches: Vec<BatchStatus>,
}

pub fn run_audit(store: &dyn DocumentStore, max_pages: usize) -> AuditOutput {
    let listings: Vec<ListingRecord> = fetch_collection(store, LISTINGS, max_pages)
        .iter()
        .map(ListingRecord::from_document)
        .collect();
    let duplicates = find_duplicate_urls(&listings);
    let batches = fetch_collection(store, BATCH_STATUS, max_pages)
        .iter()
        .map(BatchStatus::from_document)
        .collect();

    AuditOutput {
        listings,
        duplicates,
        batches,
    }
}

#[derive(Debug, Clone)]
pub struct VerifyOutput {
    pub verified: Vec<Verified>,
    pub summary: VerificationSummary,
}

pub fn run_verify(store: &dyn DocumentStore, targets: &[String], max_pages: usize) -> VerifyOutput {
    let documents = fetch_collection(store, LISTINGS, max_pages);
    let verified = verify_documents(&documents, targets);
    let summary = summarize(documents.len(), &verified);
    VerifyOutput { verified, summary }
}

#[derive(Debug, Clone)]
pub struct MonitorOutput {
    pub fetched: usize,
    pub drops: Vec<PriceDrop>,
}

pub fn run_monitor(store: &dyn DocumentStore, max_pages: usize) -> MonitorOutput {
    let listings: Vec<ListingRecord> = fetch_collection(store, LISTINGS, max_pages)
        .iter()
        .map(ListingRecord::from_document)
        .collect();
    let drops = detect_price_drops(&listings);
    MonitorOutput {
        fetched: listings.len(),
        drops,
    }
}
