use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when handing a message to the mail relay
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Relay rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Outbound message channel
///
/// Delivery is best-effort: callers log failures and never roll back
/// committed state because of them.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotificationError>;
}

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// HTTP mail relay client
///
/// Posts each message as JSON to `{endpoint}/messages` with a bearer API key.
pub struct MailRelayClient {
    endpoint: String,
    api_key: String,
    from_address: String,
    client: Client,
}

impl MailRelayClient {
    /// Create a new relay client
    pub fn new(
        endpoint: String,
        api_key: String,
        from_address: String,
        timeout: Duration,
    ) -> Result<Self, NotificationError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key,
            from_address,
            client,
        })
    }
}

#[async_trait]
impl NotificationDispatcher for MailRelayClient {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
        let url = format!("{}/messages", self.endpoint.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&RelayMessage {
                from: &self.from_address,
                to: recipient,
                subject,
                text: body,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Mail relay returned {} for {}", status, recipient);
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Queued '{}' for {}", subject, recipient);
        Ok(())
    }
}

/// Dispatcher that only logs, used when no relay is configured
#[derive(Debug, Default, Clone)]
pub struct LogDispatcher;

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
        tracing::info!(
            recipient = recipient,
            subject = subject,
            body_len = body.len(),
            "Notification relay disabled, message logged only"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn relay_client(endpoint: String) -> MailRelayClient {
        MailRelayClient::new(
            endpoint,
            "test-key".to_string(),
            "alerts@donor-match.test".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_relay_posts_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "from": "alerts@donor-match.test",
                "to": "patient@example.com",
                "subject": "Acceptance Confirmed",
            })))
            .with_status(202)
            .create_async()
            .await;

        let client = relay_client(server.url());
        client
            .send("patient@example.com", "Acceptance Confirmed", "Hello")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_relay_rejection_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/messages")
            .with_status(503)
            .with_body("relay down")
            .create_async()
            .await;

        let client = relay_client(format!("{}/", server.url()));
        let result = client.send("donor@example.com", "Subject", "Body").await;

        match result {
            Err(NotificationError::Rejected { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "relay down");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_log_dispatcher_always_succeeds() {
        let result = tokio_test::block_on(LogDispatcher.send("a@example.com", "s", "b"));
        assert!(result.is_ok());
    }
}
