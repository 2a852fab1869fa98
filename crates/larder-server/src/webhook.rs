//! Messaging-platform callback payload. Only the fields the ledger
//! needs are modeled; everything else in the body is ignored.

use serde::Deserialize;

use larder_core::{ContextId, InboundMessage};

#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub message: Option<EventMessage>,
    #[serde(default)]
    pub source: Option<EventSource>,
}

#[derive(Debug, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

impl WebhookPayload {
    /// The usable text messages in this callback. Events missing text,
    /// reply token, or source are dropped.
    pub fn into_messages(self) -> Vec<InboundMessage> {
        self.events
            .into_iter()
            .filter_map(WebhookEvent::into_message)
            .collect()
    }
}

impl WebhookEvent {
    /// Conversation identity prefers group over room over user, the
    /// order the platform populates them.
    fn into_message(self) -> Option<InboundMessage> {
        let message = self.message?;
        if message.kind != "text" {
            return None;
        }
        let text = message.text?;
        let reply_token = self.reply_token?;
        let source = self.source?;
        let context = source.group_id.or(source.room_id).or(source.user_id)?;
        Some(InboundMessage::new(
            ContextId::from_raw(context),
            text,
            reply_token,
        ))
    }
}
