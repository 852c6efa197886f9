use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    formatting::Reply,
    Result,
};

/// Capabilities / limits of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub max_message_len: usize,
}

/// Cross-messenger port.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef>;
}

/// Render a reply and send it, split on line boundaries so that no message
/// exceeds `safe_limit` (or the messenger's own limit, if smaller).
pub async fn send_reply(
    messenger: &dyn MessagingPort,
    chat_id: ChatId,
    reply: &Reply,
    safe_limit: usize,
) -> Result<Vec<MessageRef>> {
    let limit = safe_limit.min(messenger.capabilities().max_message_len).max(200);
    let mut sent = Vec::new();
    for chunk in reply.to_html_chunks(limit) {
        sent.push(messenger.send_html(chat_id, &chunk).await?);
    }
    Ok(sent)
}
