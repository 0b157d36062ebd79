//! Bounded collection drain.
//!
//! Each round lists one page and deletes every document on it. The drain stops
//! when a round finds nothing, when a round makes no progress, or at the round
//! cap. A concurrent writer can therefore leave documents behind, but can never
//! keep the loop alive forever.

use tracing::{info, warn};

use crate::store::{DeleteOutcome, DocumentStore};

pub const DEFAULT_COLLECTIONS: [&str; 2] = ["listings", "batch_status"];
pub const DEFAULT_MAX_ROUNDS: usize = 100;

/// Why a drain stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainStop {
    /// A listing came back empty.
    Empty,
    /// Hit the round cap with documents still present.
    RoundLimit,
    /// Every delete in a round failed.
    NoProgress,
    /// Listing the collection failed.
    ListFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainReport {
    pub collection: String,
    pub deleted: usize,
    pub already_gone: usize,
    pub failed: usize,
    pub rounds: usize,
    pub stop: DrainStop,
}

impl DrainReport {
    pub fn is_complete(&self) -> bool {
        self.stop == DrainStop::Empty
    }
}

/// Per-document progress, for callers that print as they go.
pub enum DrainEvent<'a> {
    Deleted { id: &'a str },
    AlreadyGone { id: &'a str },
    Failed { name: &'a str, error: String },
}

/// Delete every document in `collection`, at most `max_rounds` list/delete rounds.
pub fn drain_collection(
    store: &dyn DocumentStore,
    collection: &str,
    max_rounds: usize,
    mut on_event: impl FnMut(DrainEvent<'_>),
) -> DrainReport {
    let mut report = DrainReport {
        collection: collection.to_string(),
        deleted: 0,
        already_gone: 0,
        failed: 0,
        rounds: 0,
        stop: DrainStop::RoundLimit,
    };

    while report.rounds < max_rounds {
        let page = match store.list_page(collection, None) {
            Ok(page) => page,
            Err(err) => {
                warn!(collection, "error fetching collection: {err}");
                report.stop = DrainStop::ListFailed;
                return report;
            }
        };
        if page.documents.is_empty() {
            report.stop = DrainStop::Empty;
            return report;
        }

        report.rounds += 1;
        info!(collection, round = report.rounds, count = page.documents.len(), "deleting page");

        let mut progressed = false;
        for doc in &page.documents {
            match store.delete(&doc.name) {
                Ok(DeleteOutcome::Deleted) => {
                    report.deleted += 1;
                    progressed = true;
                    on_event(DrainEvent::Deleted { id: doc.id() });
                }
                Ok(DeleteOutcome::AlreadyGone) => {
                    report.already_gone += 1;
                    progressed = true;
                    on_event(DrainEvent::AlreadyGone { id: doc.id() });
                }
                Err(err) => {
                    report.failed += 1;
                    warn!(document = %doc.name, "delete failed: {err}");
                    on_event(DrainEvent::Failed {
                        name: &doc.name,
                        error: err.to_string(),
                    });
                }
            }
        }

        if !progressed {
            report.stop = DrainStop::NoProgress;
            return report;
        }
    }

    // Cap reached: a last look tells us whether we happened to finish exactly.
    if let Ok(page) = store.list_page(collection, None) {
        if page.documents.is_empty() {
            report.stop = DrainStop::Empty;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::testing::{MemoryStore, doc};

    fn seeded(n: usize) -> MemoryStore {
        let mut docs: Vec<_> = (0..n).map(|i| doc("listings", &format!("l{i}"), json!({}))).collect();
        docs.push(doc("batch_status", "b0", json!({})));
        MemoryStore::new(docs)
    }

    #[test]
    fn drains_across_pages() {
        let store = seeded(45);
        let mut ids = Vec::new();
        let report = drain_collection(&store, "listings", 10, |event| {
            if let DrainEvent::Deleted { id } = event {
                ids.push(id.to_string());
            }
        });
        assert!(report.is_complete());
        assert_eq!(report.deleted, 45);
        assert_eq!(report.rounds, 3);
        assert_eq!(ids.len(), 45);
        // Other collections are untouched.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn empty_collection_takes_no_rounds() {
        let store = seeded(0);
        let report = drain_collection(&store, "listings", 10, |_| {});
        assert_eq!(report.stop, DrainStop::Empty);
        assert_eq!(report.rounds, 0);
    }

    #[test]
    fn concurrent_writer_hits_round_cap() {
        let mut store = seeded(5);
        store.refill = true;
        let report = drain_collection(&store, "listings", 4, |_| {});
        assert_eq!(report.stop, DrainStop::RoundLimit);
        assert_eq!(report.rounds, 4);
        assert_eq!(report.deleted, 20);
        assert!(!report.is_complete());
    }

    #[test]
    fn exact_finish_at_cap_is_complete() {
        let store = seeded(40);
        let report = drain_collection(&store, "listings", 2, |_| {});
        assert_eq!(report.rounds, 2);
        assert!(report.is_complete());
    }

    #[test]
    fn undeletable_page_stops_without_spinning() {
        let mut store = seeded(2);
        store.undeletable = store
            .docs
            .borrow()
            .iter()
            .filter(|d| d.name.contains("/listings/"))
            .map(|d| d.name.clone())
            .collect();
        let mut failures = 0;
        let report = drain_collection(&store, "listings", 50, |event| {
            if let DrainEvent::Failed { .. } = event {
                failures += 1;
            }
        });
        assert_eq!(report.stop, DrainStop::NoProgress);
        assert_eq!(report.failed, 2);
        assert_eq!(failures, 2);
        assert_eq!(report.rounds, 1);
    }

    #[test]
    fn list_failure_ends_drain() {
        let mut store = seeded(3);
        store.fail_list_after = Some(0);
        let report = drain_collection(&store, "listings", 5, |_| {});
        assert_eq!(report.stop, DrainStop::ListFailed);
        assert_eq!(report.deleted, 0);
    }
}
