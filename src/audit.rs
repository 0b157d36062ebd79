//! Listing dump helpers: duplicate URL detection.

use std::collections::HashMap;

use crate::domain::ListingRecord;

/// A URL stored on more than one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateUrl {
    pub url: String,
    pub count: usize,
}

/// URLs that appear more than once, in order of first appearance.
///
/// Listings without a URL (or with an empty one) are ignored.
pub fn find_duplicate_urls(records: &[ListingRecord]) -> Vec<DuplicateUrl> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for url in records.iter().filter_map(|r| r.url.as_deref()).filter(|u| !u.is_empty()) {
        let count = counts.entry(url).or_insert(0);
        if *count == 0 {
            order.push(url);
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter_map(|url| {
            let count = counts[url];
            (count > 1).then(|| DuplicateUrl {
                url: url.to_string(),
                count,
            })
        })
        .collect()
}
