//! Telegram adapter (teloxide).
//!
//! This crate implements the `modbot-core` ChatPlatform port over Telegram Bot API.

use async_trait::async_trait;

use teloxide::{prelude::*, types::ParseMode, RequestError};

use tokio::{sync::OnceCell, time::sleep};

pub mod handlers;
pub mod router;

use modbot_core::{
    domain::{ChatId, ChatMember, MemberStatus, MessageId, MessageRef, UserId, UserProfile},
    errors::Error,
    platform::ChatPlatform,
    Result,
};

#[derive(Clone)]
pub struct TelegramPlatform {
    bot: Bot,
    me: OnceCell<UserProfile>,
}

impl TelegramPlatform {
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            me: OnceCell::new(),
        }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_user(user_id: UserId) -> teloxide::types::UserId {
        teloxide::types::UserId(user_id.0 as u64)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn map_err(e: RequestError) -> Error {
        match e {
            RequestError::Api(api) => Error::BadRequest(api.to_string()),
            other => Error::External(format!("telegram error: {other}")),
        }
    }

    /// Retries once on 429 `RetryAfter`. Only used for outbound messages;
    /// membership changes are never retried.
    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

pub fn profile_from_user(user: &teloxide::types::User) -> UserProfile {
    UserProfile {
        id: UserId(user.id.0 as i64),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        username: user.username.clone(),
    }
}

pub fn member_from_tg(member: &teloxide::types::ChatMember) -> ChatMember {
    use teloxide::types::ChatMemberStatus as S;

    let status = match member.kind.status() {
        S::Owner => MemberStatus::Owner,
        S::Administrator => MemberStatus::Administrator,
        S::Member => MemberStatus::Member,
        S::Restricted => MemberStatus::Restricted,
        S::Left => MemberStatus::Left,
        S::Banned => MemberStatus::Banned,
    };

    ChatMember {
        user: profile_from_user(&member.user),
        status,
        can_restrict_members: member.kind.can_restrict_members(),
    }
}

#[async_trait]
impl ChatPlatform for TelegramPlatform {
    async fn self_identity(&self) -> Result<UserProfile> {
        self.me
            .get_or_try_init(|| async {
                let me = self.bot.get_me().await.map_err(Self::map_err)?;
                Ok::<_, Error>(profile_from_user(&me.user))
            })
            .await
            .cloned()
    }

    async fn get_member(&self, chat: ChatId, user: UserId) -> Result<ChatMember> {
        let member = self
            .bot
            .get_chat_member(Self::tg_chat(chat), Self::tg_user(user))
            .await
            .map_err(Self::map_err)?;
        Ok(member_from_tg(&member))
    }

    async fn ban_member(&self, chat: ChatId, user: UserId) -> Result<()> {
        self.bot
            .ban_chat_member(Self::tg_chat(chat), Self::tg_user(user))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn unban_member(&self, chat: ChatId, user: UserId, only_if_banned: bool) -> Result<()> {
        self.bot
            .unban_chat_member(Self::tg_chat(chat), Self::tg_user(user))
            .only_if_banned(only_if_banned)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn reply(&self, to: MessageRef, html: &str) -> Result<MessageRef> {
        // Transport-level 429 handling only; the removal workflow itself never retries.
        let msg = self
            .with_retry(|| {
                self.bot
                    .send_message(Self::tg_chat(to.chat_id), html.to_string())
                    .parse_mode(ParseMode::Html)
                    .reply_to_message_id(Self::tg_msg_id(to.message_id))
            })
            .await?;

        Ok(MessageRef {
            chat_id: to.chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn send_text(&self, chat: ChatId, html: &str) -> Result<MessageRef> {
        // Transport-level 429 handling only, as in `reply`.
        let msg = self
            .with_retry(|| {
                self.bot
                    .send_message(Self::tg_chat(chat), html.to_string())
                    .parse_mode(ParseMode::Html)
            })
            .await?;

        Ok(MessageRef {
            chat_id: chat,
            message_id: MessageId(msg.id.0),
        })
    }
}
