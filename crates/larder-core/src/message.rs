use serde::{Deserialize, Serialize};

use crate::ids::ContextId;

/// One inbound chat message as handed over by the transport: where it
/// came from, what it says, and the opaque token replies go back on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub context_id: ContextId,
    pub text: String,
    pub reply_token: String,
}

impl InboundMessage {
    pub fn new(
        context_id: ContextId,
        text: impl Into<String>,
        reply_token: impl Into<String>,
    ) -> Self {
        Self {
            context_id,
            text: text.into(),
            reply_token: reply_token.into(),
        }
    }
}
