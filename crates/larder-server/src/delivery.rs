use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

const LINE_REPLY_ENDPOINT: &str = "https://api.line.me/v2/bot/message/reply";

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("platform returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Pushes a reply text back to the conversation. Best-effort from the
/// engine's perspective: a failed delivery is logged by the caller and
/// never rolls back a store mutation.
#[async_trait]
pub trait ReplyDelivery: Send + Sync {
    async fn deliver(&self, reply_token: &str, text: &str) -> Result<(), DeliveryError>;
}

/// Reply delivery against the LINE Messaging API reply endpoint.
pub struct LineDelivery {
    http: reqwest::Client,
    token: SecretString,
    endpoint: String,
}

impl LineDelivery {
    pub fn new(token: SecretString) -> Self {
        Self::with_endpoint(token, LINE_REPLY_ENDPOINT)
    }

    /// Override the endpoint, for tests pointed at a local server.
    pub fn with_endpoint(token: SecretString, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ReplyDelivery for LineDelivery {
    async fn deliver(&self, reply_token: &str, text: &str) -> Result<(), DeliveryError> {
        let payload = serde_json::json!({
            "replyToken": reply_token,
            "messages": [{ "type": "text", "text": text }],
        });
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.token.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// In-memory delivery that records every reply, for tests.
#[derive(Default)]
pub struct RecordingDelivery {
    sent: std::sync::Mutex<Vec<(String, String)>>,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyDelivery for RecordingDelivery {
    async fn deliver(&self, reply_token: &str, text: &str) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .push((reply_token.to_string(), text.to_string()));
        Ok(())
    }
}
