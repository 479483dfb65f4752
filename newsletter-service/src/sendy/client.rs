//! HTTP client for the Sendy API.
//!
//! All Sendy endpoints accept form-encoded POSTs and answer with plain text.
//! The [`Transport`] trait isolates the wire so the bridge and publisher can
//! be exercised against mocks without a network.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::email::EmailContent;
use crate::settings::NewsletterSettings;

/// Transport-level failure talking to the Sendy API.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Other(String),
}

/// A form-encoded POST returning the plain-text response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_form(
        &self,
        url: &str,
        fields: &[(&str, String)],
    ) -> Result<String, TransportError>;
}

/// Reqwest-backed transport with a bounded per-request timeout.
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(
        &self,
        url: &str,
        fields: &[(&str, String)],
    ) -> Result<String, TransportError> {
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .form(fields)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else if e.is_connect() {
                    TransportError::Connect(e.to_string())
                } else {
                    TransportError::Other(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| TransportError::Other(e.to_string()))
    }
}

/// Thin wrapper over the Sendy endpoints used by the bridge and publisher.
#[derive(Clone)]
pub struct SendyClient {
    transport: Arc<dyn Transport>,
}

impl SendyClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `POST {base}/subscribe`: add an address to a list.
    ///
    /// Returns the raw response body; classification is the caller's job via
    /// [`super::response::classify_subscribe_response`].
    pub async fn subscribe(
        &self,
        settings: &NewsletterSettings,
        list_id: &str,
        email: &str,
    ) -> Result<String, TransportError> {
        let url = format!("{}/subscribe", settings.api_url);
        let fields = [
            ("email", email.to_string()),
            ("list", list_id.to_string()),
            ("boolean", "true".to_string()),
            ("api_key", settings.api_key.clone()),
        ];

        debug!(list_id = list_id, "sendy_subscribe_request");
        self.transport.post_form(&url, &fields).await
    }

    /// `POST {base}/api/campaigns/status.php`: probe whether a campaign exists.
    pub async fn campaign_status(
        &self,
        settings: &NewsletterSettings,
        campaign_id: &str,
    ) -> Result<String, TransportError> {
        let url = format!("{}/api/campaigns/status.php", settings.api_url);
        let fields = [
            ("api_key", settings.api_key.clone()),
            ("campaign_id", campaign_id.to_string()),
        ];

        debug!(campaign_id = campaign_id, "sendy_campaign_status_request");
        self.transport.post_form(&url, &fields).await
    }

    /// `POST {base}/api/campaigns/create.php` or `.../update.php`.
    ///
    /// With a `campaign_id` the existing campaign is updated in place;
    /// without one the upstream allocates a new ID and answers with it.
    pub async fn submit_campaign(
        &self,
        settings: &NewsletterSettings,
        content: &EmailContent,
        campaign_id: Option<&str>,
    ) -> Result<String, TransportError> {
        let endpoint = if campaign_id.is_some() {
            "/api/campaigns/update.php"
        } else {
            "/api/campaigns/create.php"
        };
        let url = format!("{}{}", settings.api_url, endpoint);

        let mut fields = vec![
            ("api_key", settings.api_key.clone()),
            ("from_name", settings.from_name.clone()),
            ("from_email", settings.from_email.clone()),
            ("reply_to", settings.reply_to.clone()),
            ("subject", content.subject.clone()),
            ("plain_text", content.plain_text.clone()),
            ("html_text", content.html_body.clone()),
            ("brand_id", settings.brand_id.clone()),
        ];
        if let Some(id) = campaign_id {
            fields.push(("campaign_id", id.to_string()));
        }

        debug!(
            endpoint = endpoint,
            updating = campaign_id.is_some(),
            "sendy_campaign_submit_request"
        );
        self.transport.post_form(&url, &fields).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared mock transport for bridge and publisher tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Scripted transport: answers requests from a queue of canned results
    /// and records every call for assertions.
    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<Vec<Result<String, TransportError>>>,
        pub calls: AtomicUsize,
        pub seen_urls: Mutex<Vec<String>>,
        pub seen_fields: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl MockTransport {
        /// Transport answering every call with the same body.
        pub fn echoing(body: &str) -> Self {
            let transport = Self::default();
            transport
                .responses
                .lock()
                .unwrap()
                .push(Ok(body.to_string()));
            transport
        }

        /// Transport answering calls in order from `scripted` (last entry
        /// repeats once the script runs out).
        pub fn scripted(scripted: Vec<Result<String, TransportError>>) -> Self {
            let transport = Self::default();
            *transport.responses.lock().unwrap() = scripted;
            transport
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn post_form(
            &self,
            url: &str,
            fields: &[(&str, String)],
        ) -> Result<String, TransportError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_urls.lock().unwrap().push(url.to_string());
            self.seen_fields.lock().unwrap().push(
                fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            );

            let responses = self.responses.lock().unwrap();
            let index = call.min(responses.len().saturating_sub(1));
            match responses.get(index) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(TransportError::Timeout)) => Err(TransportError::Timeout),
                Some(Err(TransportError::Connect(msg))) => {
                    Err(TransportError::Connect(msg.clone()))
                }
                Some(Err(TransportError::Status(code))) => Err(TransportError::Status(*code)),
                Some(Err(TransportError::Other(msg))) => Err(TransportError::Other(msg.clone())),
                None => Err(TransportError::Other("no scripted response".to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockTransport;
    use super::*;

    fn settings() -> NewsletterSettings {
        NewsletterSettings {
            api_key: "key".to_string(),
            api_url: "https://mail.example.com/sendy".to_string(),
            ..NewsletterSettings::default()
        }
    }

    #[tokio::test]
    async fn test_subscribe_hits_subscribe_endpoint() {
        let transport = Arc::new(MockTransport::echoing("1"));
        let client = SendyClient::new(transport.clone());

        let body = client
            .subscribe(&settings(), "42", "user@example.com")
            .await
            .unwrap();

        assert_eq!(body, "1");
        let urls = transport.seen_urls.lock().unwrap();
        assert_eq!(urls[0], "https://mail.example.com/sendy/subscribe");

        let fields = transport.seen_fields.lock().unwrap();
        assert!(fields[0].contains(&("email".to_string(), "user@example.com".to_string())));
        assert!(fields[0].contains(&("list".to_string(), "42".to_string())));
        assert!(fields[0].contains(&("boolean".to_string(), "true".to_string())));
        assert!(fields[0].contains(&("api_key".to_string(), "key".to_string())));
    }

    #[tokio::test]
    async fn test_submit_campaign_picks_endpoint_by_id() {
        let transport = Arc::new(MockTransport::echoing("77"));
        let client = SendyClient::new(transport.clone());
        let content = EmailContent {
            subject: "Subject".to_string(),
            html_body: "<html></html>".to_string(),
            plain_text: "text".to_string(),
        };

        client
            .submit_campaign(&settings(), &content, None)
            .await
            .unwrap();
        client
            .submit_campaign(&settings(), &content, Some("77"))
            .await
            .unwrap();

        let urls = transport.seen_urls.lock().unwrap();
        assert!(urls[0].ends_with("/api/campaigns/create.php"));
        assert!(urls[1].ends_with("/api/campaigns/update.php"));

        let fields = transport.seen_fields.lock().unwrap();
        assert!(!fields[0].iter().any(|(k, _)| k == "campaign_id"));
        assert!(fields[1].contains(&("campaign_id".to_string(), "77".to_string())));
    }
}
