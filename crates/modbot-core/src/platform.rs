use async_trait::async_trait;

use crate::{
    domain::{ChatId, ChatMember, MessageRef, UserId, UserProfile},
    Result,
};

/// Port over the chat platform (Telegram today).
///
/// Outbound text is HTML; callers escape dynamic fragments with
/// [`crate::formatting::escape_html`].
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// The bot's own identity. Implementations cache it after the first call.
    async fn self_identity(&self) -> Result<UserProfile>;

    /// Membership of `user` in `chat`. Fails with [`crate::Error::BadRequest`]
    /// when the user is unknown to the chat.
    async fn get_member(&self, chat: ChatId, user: UserId) -> Result<ChatMember>;

    async fn ban_member(&self, chat: ChatId, user: UserId) -> Result<()>;

    async fn unban_member(&self, chat: ChatId, user: UserId, only_if_banned: bool) -> Result<()>;

    /// Send `html` as a direct reply to `to`.
    async fn reply(&self, to: MessageRef, html: &str) -> Result<MessageRef>;

    async fn send_text(&self, chat: ChatId, html: &str) -> Result<MessageRef>;
}
