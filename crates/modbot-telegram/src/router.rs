use std::sync::Arc;

use teloxide::{dispatching::Dispatcher as TgDispatcher, dptree, prelude::*};
use tracing::{info, warn};

use modbot_core::{
    config::Config,
    dispatch::Dispatcher,
    handlers::{standard_dispatcher, DispatchOptions},
    platform::ChatPlatform,
    username_cache::UsernameCache,
};

use crate::handlers;
use crate::TelegramPlatform;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());
    let platform = Arc::new(TelegramPlatform::new(bot.clone()));

    let me = platform
        .self_identity()
        .await
        .map_err(|e| anyhow::anyhow!("failed to fetch bot identity: {e}"))?;
    info!(
        bot_id = me.id.0,
        "modbot started: @{}",
        me.username.as_deref().unwrap_or("")
    );

    if cfg.drop_pending_updates {
        if let Err(e) = bot.delete_webhook().drop_pending_updates(true).await {
            warn!("Failed to drop pending updates: {e}");
        }
    }

    // Cache lives exactly as long as this polling session.
    let usernames = Arc::new(UsernameCache::new());
    let dispatcher = standard_dispatcher(
        platform,
        usernames,
        DispatchOptions {
            bot_username: me.username.clone(),
            text_trigger: cfg.delete_text_trigger,
        },
    )?;
    info!(handlers = ?dispatcher.handler_names(), "handlers registered");

    let state = Arc::new(AppState {
        dispatcher: Arc::new(dispatcher),
    });

    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    TgDispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
