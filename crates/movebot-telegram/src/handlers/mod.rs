//! Telegram update handlers.
//!
//! Each handler is a small adapter that:
//! - validates auth + rate limits
//! - parses the command text
//! - calls into the `movebot-core` command engine and sends its reply

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use movebot_core::{
    domain::{ChatId, OwnerId},
    formatting::Reply,
    messaging::port::send_reply,
    security::is_authorized,
};

use crate::router::AppState;
mod commands;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = ChatId(msg.chat.id.0);
    let user_id = msg.from().map(|u| OwnerId(u.id.0 as i64));

    // Only commands are ours; plain chatter is ignored.
    let Some(text) = msg.text() else {
        return Ok(());
    };
    if !text.starts_with('/') {
        return Ok(());
    }

    if !is_authorized(user_id, &state.cfg.telegram_allowed_users) {
        tracing::warn!(chat = chat_id.0, user = ?user_id, "unauthorized command");
        let denied = Reply::error("Unauthorized", "Contact the bot owner for access.");
        reply(&state, chat_id, denied).await;
        return Ok(());
    }
    let Some(owner) = user_id else {
        return Ok(());
    };

    let (allowed, retry_after) = state.rate_limiter.lock().await.check(owner);
    if !allowed {
        let wait = retry_after.map(|d| d.as_secs_f64().ceil() as u64).unwrap_or(0);
        tracing::warn!(owner = owner.0, wait, "rate limited");
        let slow = Reply::error("Slow Down", format!("Too many commands. Try again in {wait}s."));
        reply(&state, chat_id, slow).await;
        return Ok(());
    }

    commands::handle_command(&state, chat_id, owner, text).await;
    Ok(())
}

/// Best-effort send; a failed send is logged, never propagated.
async fn reply(state: &AppState, chat_id: ChatId, reply: Reply) {
    if let Err(e) = send_reply(
        state.messenger.as_ref(),
        chat_id,
        &reply,
        state.cfg.telegram_safe_limit,
    )
    .await
    {
        tracing::error!(chat = chat_id.0, error = %e, "failed to send reply");
    }
}
