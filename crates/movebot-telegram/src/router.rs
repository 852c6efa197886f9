use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tokio::sync::Mutex;

use movebot_core::{
    config::Config, messaging::port::MessagingPort, security::RateLimiter,
    service::MoveService,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub service: Arc<MoveService>,
    pub messenger: Arc<dyn MessagingPort>,
    pub rate_limiter: Arc<Mutex<RateLimiter>>,
    /// Our own username, for telling `/cmd@us` from `/cmd@someone_else`.
    pub bot_username: Option<String>,
}

impl AppState {
    pub fn new(
        cfg: Arc<Config>,
        service: Arc<MoveService>,
        messenger: Arc<dyn MessagingPort>,
        bot_username: Option<String>,
    ) -> Self {
        let rate_limiter = RateLimiter::new(
            cfg.rate_limit_enabled,
            cfg.rate_limit_requests,
            cfg.rate_limit_window,
        );
        Self {
            cfg,
            service,
            messenger,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
            bot_username,
        }
    }
}

/// Long-poll Telegram until Ctrl-C. Each update is handled on its own task,
/// so a slow lookup for one user never delays another.
pub async fn run_polling(cfg: Arc<Config>, service: Arc<MoveService>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    let bot_username = match bot.get_me().await {
        Ok(me) => {
            tracing::info!(username = %me.username(), "movebot started");
            Some(me.username().to_string())
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not fetch bot identity");
            None
        }
    };
    if cfg.telegram_allowed_users.is_empty() {
        tracing::info!("no allow-list configured; every user may register moves");
    } else {
        tracing::info!(
            allowed = cfg.telegram_allowed_users.len(),
            "allow-list active"
        );
    }

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let state = Arc::new(AppState::new(cfg, service, messenger, bot_username));

    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("dispatcher stopped");
    Ok(())
}
