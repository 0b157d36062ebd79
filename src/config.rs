//! Explicit configuration passed to each component.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Nothing here talks to the network.

use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_PROJECT_ID: &str = "ai-property-hub-2fcea";
pub const DEFAULT_DATABASE: &str = "(default)";
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_NOTIFY_URL: &str = "https://notify-api.line.me/api/notify";

const DEFAULT_PAGE_SIZE: u32 = 300;
const DEFAULT_MAX_PAGES: usize = 50;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the document store lives and how to page through it.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub project_id: String,
    pub database: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub page_size: u32,
    pub max_pages: usize,
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let timeout_secs = parse_or(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            project_id: non_empty(&lookup, "FIREBASE_PROJECT_ID").unwrap_or(defaults.project_id),
            database: non_empty(&lookup, "FIRESTORE_DATABASE").unwrap_or(defaults.database),
            base_url: non_empty(&lookup, "FIRESTORE_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            api_key: non_empty(&lookup, "FIREBASE_API_KEY"),
            page_size: parse_or(&lookup, "FIRESTORE_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            max_pages: parse_or(&lookup, "FIRESTORE_MAX_PAGES", DEFAULT_MAX_PAGES)?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// `{base}/v1/projects/{project}/databases/{database}/documents`
    pub fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents",
            self.base_url, self.project_id, self.database
        )
    }

    pub fn collection_url(&self, collection: &str) -> String {
        format!("{}/{collection}", self.documents_url())
    }

    /// Document names returned by the store are already full resource paths.
    pub fn document_url(&self, document_name: &str) -> String {
        format!("{}/v1/{document_name}", self.base_url)
    }
}

/// Outbound notification webhook.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Bearer token. `None` disables notifications.
    pub token: Option<String>,
    pub url: String,
    pub timeout: Duration,
}

impl NotifyConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let timeout_secs = parse_or(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        Ok(Self {
            token: non_empty(&lookup, "NOTIFY_WEBHOOK"),
            url: non_empty(&lookup, "NOTIFY_URL").unwrap_or_else(|| DEFAULT_NOTIFY_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match non_empty(lookup, key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| AppError::config(format!("Invalid {key} value '{raw}'."))),
    }
}
