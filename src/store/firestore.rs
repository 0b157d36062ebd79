//! Firestore REST API client (blocking).

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};

use crate::config::StoreConfig;
use crate::error::AppError;
use crate::store::{DeleteOutcome, DocumentPage, DocumentStore, StoreError};

/// Longest slice of an error body we keep for logging.
const ERROR_BODY_LIMIT: usize = 500;

pub struct FirestoreClient {
    client: Client,
    config: StoreConfig,
}

impl FirestoreClient {
    pub fn new(config: StoreConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::io(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::new(StoreConfig::from_env()?)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn with_key(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => req.query(&[("key", key.as_str())]),
            None => req,
        }
    }
}

impl DocumentStore for FirestoreClient {
    fn list_page(&self, collection: &str, page_token: Option<&str>) -> Result<DocumentPage, StoreError> {
        let mut req = self
            .client
            .get(self.config.collection_url(collection))
            .query(&[("pageSize", self.config.page_size.to_string())]);
        if let Some(token) = page_token {
            req = req.query(&[("pageToken", token)]);
        }

        let resp = self
            .with_key(req)
            .send()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        // A collection that was never written to reads as empty, not missing.
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(DocumentPage::default());
        }
        let resp = ensure_success(resp)?;

        resp.json::<DocumentPage>()
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn delete(&self, document_name: &str) -> Result<DeleteOutcome, StoreError> {
        let req = self.client.delete(self.config.document_url(document_name));
        let resp = self
            .with_key(req)
            .send()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(DeleteOutcome::AlreadyGone);
        }
        ensure_success(resp)?;
        Ok(DeleteOutcome::Deleted)
    }
}

fn ensure_success(resp: Response) -> Result<Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body: clip(body.trim(), ERROR_BODY_LIMIT),
    })
}

fn clip(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    use super::*;
    use crate::store::fetch_collection;
    use crate::store::testing::HttpFixture;

    const LISTINGS_PATH: &str = "/v1/projects/p/databases/db/documents/listings";

    fn client_for(fixture: &HttpFixture) -> FirestoreClient {
        FirestoreClient::new(StoreConfig {
            project_id: "p".to_string(),
            database: "db".to_string(),
            base_url: fixture.uri(),
            page_size: 2,
            ..StoreConfig::default()
        })
        .unwrap()
    }

    fn listing(id: &str) -> serde_json::Value {
        json!({
            "name": format!("projects/p/databases/db/documents/listings/{id}"),
            "fields": { "url": { "stringValue": format!("https://example.com/{id}") } }
        })
    }

    #[test]
    fn second_page_carries_size_and_token() {
        let fixture = HttpFixture::start();
        fixture.mount(
            Mock::given(method("GET"))
                .and(path(LISTINGS_PATH))
                .and(query_param("pageSize", "2"))
                .and(query_param("pageToken", "T2"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "documents": [listing("c")]
                })))
                .expect(1),
        );
        fixture.mount(
            Mock::given(method("GET"))
                .and(path(LISTINGS_PATH))
                .and(query_param("pageSize", "2"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "documents": [listing("a"), listing("b")],
                    "nextPageToken": "T2"
                })))
                .expect(1),
        );

        let client = client_for(&fixture);
        let docs = fetch_collection(&client, "listings", 10);
        let ids: Vec<&str> = docs.iter().map(|d| d.id()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(docs[2].string("url"), Some("https://example.com/c"));

        let requests = fixture.received();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].url.query().unwrap_or("").contains("pageToken"));
        assert!(requests[1].url.query().unwrap_or("").contains("pageToken=T2"));
    }

    #[test]
    fn missing_collection_lists_as_empty() {
        let fixture = HttpFixture::start();
        fixture.mount(
            Mock::given(method("GET"))
                .and(path(LISTINGS_PATH))
                .respond_with(ResponseTemplate::new(404).set_body_string("not found")),
        );

        let page = client_for(&fixture).list_page("listings", None).unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn server_error_is_a_status_error() {
        let fixture = HttpFixture::start();
        fixture.mount(
            Mock::given(method("GET"))
                .and(path(LISTINGS_PATH))
                .respond_with(ResponseTemplate::new(500).set_body_string("  backend exploded \n")),
        );

        let err = client_for(&fixture).list_page("listings", None).unwrap_err();
        assert_eq!(
            err,
            StoreError::Status {
                status: 500,
                body: "backend exploded".to_string(),
            }
        );
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let fixture = HttpFixture::start();
        fixture.mount(
            Mock::given(method("GET"))
                .and(path(LISTINGS_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_string("<html>")),
        );

        let err = client_for(&fixture).list_page("listings", None).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn delete_is_idempotent() {
        let fixture = HttpFixture::start();
        fixture.mount(
            Mock::given(method("DELETE"))
                .and(path(format!("{LISTINGS_PATH}/a")))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({}))),
        );
        fixture.mount(
            Mock::given(method("DELETE"))
                .and(path(format!("{LISTINGS_PATH}/gone")))
                .respond_with(ResponseTemplate::new(404)),
        );
        fixture.mount(
            Mock::given(method("DELETE"))
                .and(path(format!("{LISTINGS_PATH}/locked")))
                .respond_with(ResponseTemplate::new(403).set_body_string("denied")),
        );

        let client = client_for(&fixture);
        let name = |id: &str| format!("projects/p/databases/db/documents/listings/{id}");
        assert_eq!(client.delete(&name("a")), Ok(DeleteOutcome::Deleted));
        assert_eq!(client.delete(&name("gone")), Ok(DeleteOutcome::AlreadyGone));
        assert!(matches!(
            client.delete(&name("locked")),
            Err(StoreError::Status { status: 403, .. })
        ));
    }

    #[test]
    fn api_key_rides_on_the_query() {
        let fixture = HttpFixture::start();
        fixture.mount(
            Mock::given(method("GET"))
                .and(path(LISTINGS_PATH))
                .and(query_param("key", "k123"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({}))),
        );

        let client = FirestoreClient::new(StoreConfig {
            api_key: Some("k123".to_string()),
            ..client_for(&fixture).config().clone()
        })
        .unwrap();
        assert!(client.list_page("listings", None).is_ok());
    }

    #[test]
    fn clip_keeps_short_bodies() {
        assert_eq!(clip("not found", 500), "not found");
    }

    #[test]
    fn clip_respects_char_boundaries() {
        assert_eq!(clip("未提供地址", 2), "未提...");
    }

    #[test]
    fn client_builds_from_default_config() {
        let client = FirestoreClient::new(StoreConfig::default()).unwrap();
        assert_eq!(client.config().page_size, 300);
    }
}
