//! Telegram update handlers.
//!
//! Each inbound message is converted into the core `IncomingMessage` model and
//! handed to the core dispatcher; all moderation logic lives in `modbot-core`.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};
use tracing::debug;

use modbot_core::domain::{ChatId, ChatInfo, IncomingMessage, MessageId, MessageRef};

use crate::profile_from_user;
use crate::router::AppState;

pub fn convert_message(msg: &Message) -> IncomingMessage {
    let chat_id = ChatId(msg.chat.id.0);
    IncomingMessage {
        message: MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        },
        chat: Some(ChatInfo {
            id: chat_id,
            title: msg.chat.title().map(str::to_string),
        }),
        from: msg.from().map(profile_from_user),
        text: msg.text().map(str::to_string),
        caption: msg.caption().map(str::to_string),
        reply_to_author: msg
            .reply_to_message()
            .and_then(|r| r.from())
            .map(profile_from_user),
    }
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let incoming = convert_message(&msg);
    let ran = state.dispatcher.dispatch(&incoming).await;
    if !ran.is_empty() {
        debug!(chat_id = msg.chat.id.0, handlers = ?ran, "message dispatched");
    }
    Ok(())
}
