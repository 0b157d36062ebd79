//! Outbound webhook (bearer token + form-encoded `message`).

use std::fmt;

use reqwest::blocking::Client;

#[derive(Debug, Clone, PartialEq)]
pub enum NotifyError {
    Transport(String),
    Status(u16),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Transport(msg) => write!(f, "request failed: {msg}"),
            NotifyError::Status(status) => write!(f, "webhook answered with status {status}"),
        }
    }
}

impl std::error::Error for NotifyError {}

pub trait Notifier {
    fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

pub struct WebhookNotifier {
    client: Client,
    url: String,
    token: String,
}

impl WebhookNotifier {
    pub fn new(client: Client, url: String, token: String) -> Self {
        Self { client, url, token }
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .form(&[("message", message)])
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NotifyError::Status(resp.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    use super::*;
    use crate::store::testing::HttpFixture;

    fn notifier(fixture: &HttpFixture, route: &str) -> WebhookNotifier {
        WebhookNotifier::new(
            Client::new(),
            format!("{}{route}", fixture.uri()),
            "tok".to_string(),
        )
    }

    #[test]
    fn posts_form_message_with_bearer_token() {
        let fixture = HttpFixture::start();
        fixture.mount(
            Mock::given(method("POST"))
                .and(path("/notify"))
                .and(header("authorization", "Bearer tok"))
                .and(header("content-type", "application/x-www-form-urlencoded"))
                .and(body_string("message=price+drop%3A+%241%2C000"))
                .respond_with(ResponseTemplate::new(200))
                .expect(1),
        );

        assert_eq!(notifier(&fixture, "/notify").notify("price drop: $1,000"), Ok(()));
    }

    #[test]
    fn server_error_maps_to_status() {
        let fixture = HttpFixture::start();
        fixture.mount(
            Mock::given(method("POST"))
                .and(path("/notify"))
                .respond_with(ResponseTemplate::new(500)),
        );

        assert_eq!(
            notifier(&fixture, "/notify").notify("hello"),
            Err(NotifyError::Status(500))
        );
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        let notifier = WebhookNotifier::new(
            Client::new(),
            "http://127.0.0.1:9/notify".to_string(),
            "tok".to_string(),
        );
        assert!(matches!(notifier.notify("hello"), Err(NotifyError::Transport(_))));
    }
}
