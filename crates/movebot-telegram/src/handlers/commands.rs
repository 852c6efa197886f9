use movebot_core::{
    commands::{execute, parse_error_reply, BotCommand},
    domain::{ChatId, OwnerId},
};

use crate::router::AppState;

use super::reply;

/// A `/cmd[@bot] args...` message split into its parts.
#[derive(Debug, PartialEq, Eq)]
struct ParsedCommand {
    name: String,
    mention: Option<String>,
    args: String,
}

impl ParsedCommand {
    /// Commands addressed to another bot (in a group) are not ours. With an
    /// unknown own username only unaddressed commands are taken.
    fn is_for(&self, own_username: Option<&str>) -> bool {
        match (&self.mention, own_username) {
            (None, _) => true,
            (Some(m), Some(own)) => m.eq_ignore_ascii_case(own),
            (Some(_), None) => false,
        }
    }
}

fn parse_command(text: &str) -> ParsedCommand {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let args = parts.next().unwrap_or("").trim().to_string();

    let mut head = first.trim_start_matches('/').splitn(2, '@');
    let name = head.next().unwrap_or("").to_lowercase();
    let mention = head
        .next()
        .map(str::to_string)
        .filter(|m| !m.is_empty());

    ParsedCommand {
        name,
        mention,
        args,
    }
}

pub async fn handle_command(state: &AppState, chat_id: ChatId, owner: OwnerId, text: &str) {
    let parsed = parse_command(text);
    if !parsed.is_for(state.bot_username.as_deref()) {
        tracing::debug!(mention = ?parsed.mention, "command addressed to another bot");
        return;
    }
    tracing::debug!(owner = owner.0, cmd = %parsed.name, "command received");

    let out = match BotCommand::parse(&parsed.name, &parsed.args) {
        Ok(command) => execute(&state.service, owner, command).await,
        Err(e) => parse_error_reply(&e),
    };

    reply(state, chat_id, out).await;
}
