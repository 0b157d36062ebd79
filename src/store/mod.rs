//! Document store access.
//!
//! `DocumentStore` is the seam between the utilities and the remote REST API;
//! `FirestoreClient` is the only production implementation.

use std::fmt;

use tracing::{info, warn};

pub mod document;
pub mod firestore;

pub use document::*;
pub use firestore::FirestoreClient;

/// A remote-store failure. Never fatal to a run.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Could not reach the store (DNS, TLS, timeout, ...).
    Transport(String),
    /// The store answered with a non-success status.
    Status { status: u16, body: String },
    /// The store answered 2xx but the body was not what we expected.
    Decode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Transport(msg) => write!(f, "request failed: {msg}"),
            StoreError::Status { status, body } => write!(f, "status {status}: {body}"),
            StoreError::Decode(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Result of deleting a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The document was already gone. Deletes are idempotent.
    AlreadyGone,
}

pub trait DocumentStore {
    /// List one page of `collection`, continuing from `page_token` when given.
    fn list_page(&self, collection: &str, page_token: Option<&str>) -> Result<DocumentPage, StoreError>;

    /// Delete one document by its full resource path.
    fn delete(&self, document_name: &str) -> Result<DeleteOutcome, StoreError>;
}

/// Fetch every document in `collection`, following pagination up to `max_pages`.
///
/// Failures are logged and yield whatever was gathered so far (usually nothing),
/// so callers can report "fetched zero records" and carry on.
pub fn fetch_collection(store: &dyn DocumentStore, collection: &str, max_pages: usize) -> Vec<Document> {
    let mut documents = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0;

    loop {
        if pages == max_pages.max(1) {
            warn!(collection, max_pages, "stopped paging at the page limit; results are partial");
            break;
        }
        pages += 1;

        let page = match store.list_page(collection, page_token.as_deref()) {
            Ok(page) => page,
            Err(err) => {
                warn!(collection, "error fetching collection: {err}");
                break;
            }
        };
        documents.extend(page.documents);

        match page.next_page_token.filter(|t| !t.is_empty()) {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    info!(collection, count = documents.len(), "fetched documents");
    documents
}
