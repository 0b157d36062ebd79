//! Shared domain types.
//!
//! Records are decoded once from store documents; placeholder strings the
//! scraper writes for "not provided" become `None` here so nothing downstream
//! has to know about them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::store::{Document, Numeric};

pub const ADDRESS_NOT_PROVIDED: &str = "未提供地址";
pub const PRICE_NOT_PROVIDED: &str = "未提供";
pub const DESCRIPTION_NOT_PROVIDED: &str = "尚無描述";

const DEFAULT_LISTING_STATUS: &str = "listed";

/// One property listing as stored in the `listings` collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingRecord {
    pub id: String,
    pub url: Option<String>,
    pub address: Option<String>,
    /// Display string, e.g. `"$1,250,000"`.
    pub price: Option<String>,
    pub price_usd: f64,
    pub description: Option<String>,
    /// Price seen on the previous scrape, when the scraper recorded one.
    pub last_price_usd: Option<f64>,
    pub listing_status: String,
    pub tsmc_distance_miles: Option<Numeric>,
}

impl ListingRecord {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id().to_string(),
            url: doc.string("url").map(str::to_string),
            address: present(doc.string("address"), ADDRESS_NOT_PROVIDED),
            price: present(doc.string("price"), PRICE_NOT_PROVIDED),
            price_usd: doc.number("price_usd").map(Numeric::as_f64).unwrap_or(0.0),
            description: present(doc.string("description"), DESCRIPTION_NOT_PROVIDED),
            last_price_usd: doc.number("last_price_usd").map(Numeric::as_f64),
            listing_status: doc
                .string("listing_status")
                .unwrap_or(DEFAULT_LISTING_STATUS)
                .to_string(),
            tsmc_distance_miles: doc.number("tsmc_distance_miles"),
        }
    }
}

/// Empty strings and the placeholder both mean "absent".
fn present(value: Option<&str>, placeholder: &str) -> Option<String> {
    value
        .filter(|v| !v.is_empty() && *v != placeholder)
        .map(str::to_string)
}

/// One document from the `batch_status` collection.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStatus {
    pub id: String,
    pub current_status: Option<String>,
    pub total: i64,
    pub completed: i64,
    pub started_at: Option<DateTime<Utc>>,
    /// `startedAt` as stored; shown when it does not parse.
    pub started_at_raw: Option<String>,
}

impl BatchStatus {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id().to_string(),
            current_status: doc.string("currentStatus").map(str::to_string),
            total: doc.integer("total").unwrap_or(0),
            completed: doc.integer("completed").unwrap_or(0),
            started_at: doc.timestamp("startedAt"),
            started_at_raw: doc.timestamp_text("startedAt").map(str::to_string),
        }
    }

    /// UTC with a `Z` suffix, the raw stored text if unparsable, else `N/A`.
    pub fn started_at_display(&self) -> String {
        match (&self.started_at, &self.started_at_raw) {
            (Some(ts), _) => ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            (None, Some(raw)) => raw.clone(),
            (None, None) => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Pass,
    Fail,
}

impl ValidationStatus {
    pub fn label(self) -> &'static str {
        match self {
            ValidationStatus::Pass => "✅ PASS",
            ValidationStatus::Fail => "❌ FAIL",
        }
    }
}

/// A single finding against a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Issue {
    #[serde(rename = "Missing Address")]
    MissingAddress,
    #[serde(rename = "Missing Price")]
    MissingPrice,
    /// Informational: luxury listings may omit the description.
    #[serde(rename = "Desc Skipped (Luxury - OK)")]
    DescriptionSkippedLuxury,
    #[serde(rename = "Missing Description (<$2M)")]
    MissingDescription,
}

impl Issue {
    pub fn as_str(self) -> &'static str {
        match self {
            Issue::MissingAddress => "Missing Address",
            Issue::MissingPrice => "Missing Price",
            Issue::DescriptionSkippedLuxury => "Desc Skipped (Luxury - OK)",
            Issue::MissingDescription => "Missing Description (<$2M)",
        }
    }

    pub fn is_failure(self) -> bool {
        !matches!(self, Issue::DescriptionSkippedLuxury)
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    /// In rule order.
    pub issues: Vec<Issue>,
}

impl ValidationResult {
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        let status = if issues.iter().any(|i| i.is_failure()) {
            ValidationStatus::Fail
        } else {
            ValidationStatus::Pass
        };
        Self { status, issues }
    }

    pub fn passed(&self) -> bool {
        self.status == ValidationStatus::Pass
    }

    pub fn issue_labels(&self) -> Vec<&'static str> {
        self.issues.iter().map(|i| i.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::testing::doc;

    #[test]
    fn placeholders_decode_to_none() {
        let d = doc(
            "listings",
            "L1",
            json!({
                "address": { "stringValue": "未提供地址" },
                "price": { "stringValue": "未提供" },
                "description": { "stringValue": "尚無描述" },
                "url": { "stringValue": "https://example.com/home/1" }
            }),
        );
        let record = ListingRecord::from_document(&d);
        assert_eq!(record.id, "L1");
        assert_eq!(record.address, None);
        assert_eq!(record.price, None);
        assert_eq!(record.description, None);
        assert_eq!(record.url.as_deref(), Some("https://example.com/home/1"));
        assert_eq!(record.price_usd, 0.0);
        assert_eq!(record.listing_status, "listed");
    }

    #[test]
    fn price_usd_accepts_either_numeric_kind() {
        let d = doc("listings", "a", json!({ "price_usd": { "doubleValue": 650000.0 } }));
        assert_eq!(ListingRecord::from_document(&d).price_usd, 650000.0);

        let d = doc("listings", "b", json!({ "price_usd": { "integerValue": "2000001" } }));
        assert_eq!(ListingRecord::from_document(&d).price_usd, 2_000_001.0);
    }

    #[test]
    fn batch_status_defaults() {
        let d = doc(
            "batch_status",
            "b1",
            json!({
                "currentStatus": { "stringValue": "running" },
                "completed": { "integerValue": "3" }
            }),
        );
        let batch = BatchStatus::from_document(&d);
        assert_eq!(batch.current_status.as_deref(), Some("running"));
        assert_eq!(batch.completed, 3);
        assert_eq!(batch.total, 0);
        assert!(batch.started_at.is_none());
        assert_eq!(batch.started_at_display(), "N/A");
    }

    #[test]
    fn batch_start_keeps_zulu_and_falls_back_to_raw() {
        let d = doc(
            "batch_status",
            "b2",
            json!({ "startedAt": { "timestampValue": "2025-03-01T08:00:00Z" } }),
        );
        assert_eq!(BatchStatus::from_document(&d).started_at_display(), "2025-03-01T08:00:00Z");

        let d = doc(
            "batch_status",
            "b3",
            json!({ "startedAt": { "timestampValue": "2025-03-01 08:00" } }),
        );
        let batch = BatchStatus::from_document(&d);
        assert!(batch.started_at.is_none());
        assert_eq!(batch.started_at_display(), "2025-03-01 08:00");
    }

    #[test]
    fn issues_serialize_as_their_labels() {
        for issue in [
            Issue::MissingAddress,
            Issue::MissingPrice,
            Issue::DescriptionSkippedLuxury,
            Issue::MissingDescription,
        ] {
            assert_eq!(serde_json::to_value(issue).unwrap(), issue.as_str());
        }
    }

    #[test]
    fn luxury_skip_alone_passes() {
        let result = ValidationResult::from_issues(vec![Issue::DescriptionSkippedLuxury]);
        assert!(result.passed());
        assert_eq!(serde_json::to_value(&result).unwrap()["issues"][0], "Desc Skipped (Luxury - OK)");
        assert_eq!(serde_json::to_value(&result).unwrap()["status"], "PASS");
    }
}
