//! `/delete` and `/kick`: remove a participant from a chat.
//!
//! Every gate short-circuits with a reply and no membership change. Removal is a
//! kick: ban, then unban-if-banned so the user may rejoin later.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    domain::{ChatId, ChatMember, IncomingMessage, UserId},
    formatting::escape_html,
    permissions,
    platform::ChatPlatform,
    target::{self, ResolveError},
    username_cache::UsernameCache,
    Result,
};

/// Why a removal request was turned down before touching the chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Refusal {
    InitiatorNotAdmin,
    BotLacksRights,
    InvalidTarget(ResolveError),
    TargetIsBot,
    TargetIsInitiator,
    TargetNotInChat,
    TargetIsPrivileged,
}

impl Refusal {
    pub fn reply_text(&self) -> String {
        match self {
            Refusal::InitiatorNotAdmin => {
                "❌ Только администраторы могут использовать эту команду.".to_string()
            }
            Refusal::BotLacksRights => "❌ У бота нет прав удалять участников. \
                Сделайте бота администратором с правом «Delete users»."
                .to_string(),
            Refusal::InvalidTarget(e) => format!("❌ {e}"),
            Refusal::TargetIsBot => "❌ Нельзя удалить бота.".to_string(),
            Refusal::TargetIsInitiator => "❌ Нельзя удалить самого себя.".to_string(),
            Refusal::TargetNotInChat => "❌ Цель не найдена в чате.".to_string(),
            Refusal::TargetIsPrivileged => {
                "❌ Нельзя удалить владельца или администратора чата.".to_string()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The update had no chat or no sender; nothing was sent.
    Ignored,
    Refused(Refusal),
    /// The ban/unban call failed; carries the platform error text.
    Failed(String),
    Removed { user_id: UserId, display_name: String },
}

/// "Full Name (@username)" or just "Full Name".
pub fn display_name(member: &ChatMember) -> String {
    match member.user.mention() {
        Some(mention) => format!("{} ({mention})", member.user.full_name()),
        None => member.user.full_name(),
    }
}

pub struct RemovalWorkflow {
    platform: Arc<dyn ChatPlatform>,
    usernames: Arc<UsernameCache>,
}

impl RemovalWorkflow {
    pub fn new(platform: Arc<dyn ChatPlatform>, usernames: Arc<UsernameCache>) -> Self {
        Self {
            platform,
            usernames,
        }
    }

    /// Run one removal request. Errors are only returned when the reply itself
    /// or the bot identity lookup fails.
    pub async fn run(
        &self,
        msg: &IncomingMessage,
        argument: Option<&str>,
    ) -> Result<RemovalOutcome> {
        let outcome = self.evaluate(msg, argument).await?;

        let text = match &outcome {
            RemovalOutcome::Ignored => return Ok(outcome),
            RemovalOutcome::Refused(refusal) => refusal.reply_text(),
            RemovalOutcome::Failed(detail) => {
                format!("❌ Не удалось удалить пользователя: {}", escape_html(detail))
            }
            RemovalOutcome::Removed { display_name, .. } => {
                format!("✅ Пользователь удалён: {}", escape_html(display_name))
            }
        };
        self.platform.reply(msg.message, &text).await?;
        Ok(outcome)
    }

    async fn evaluate(
        &self,
        msg: &IncomingMessage,
        argument: Option<&str>,
    ) -> Result<RemovalOutcome> {
        let (Some(chat), Some(initiator)) = (msg.chat.as_ref(), msg.from.as_ref()) else {
            return Ok(RemovalOutcome::Ignored);
        };
        let platform = self.platform.as_ref();
        let chat_id = chat.id;
        let initiator_name = initiator.full_name();
        let initiator_id = initiator.id;

        if !permissions::is_admin(platform, initiator_id, chat_id).await {
            warn!(
                chat_id = chat_id.0,
                "User {initiator_name} ({initiator_id}) attempted to delete but is not an admin"
            );
            return Ok(RemovalOutcome::Refused(Refusal::InitiatorNotAdmin));
        }

        if !permissions::can_remove_members(platform, chat_id).await {
            warn!(
                "Bot lacks delete permissions in chat {} ({chat_id}) for request from {initiator_name} ({initiator_id})",
                chat.title.as_deref().unwrap_or("")
            );
            return Ok(RemovalOutcome::Refused(Refusal::BotLacksRights));
        }

        let target = match target::resolve(
            &self.usernames,
            chat_id,
            msg.reply_to_author.as_ref(),
            argument,
        ) {
            Ok(target) => target,
            Err(e) => {
                warn!(
                    chat_id = chat_id.0,
                    "Admin {initiator_name} ({initiator_id}) provided invalid target: {argument:?}"
                );
                return Ok(RemovalOutcome::Refused(Refusal::InvalidTarget(e)));
            }
        };

        let me = platform.self_identity().await?;
        if target.user_id == me.id {
            warn!("Admin {initiator_name} ({initiator_id}) attempted to delete the bot in chat {chat_id}");
            return Ok(RemovalOutcome::Refused(Refusal::TargetIsBot));
        }

        if target.user_id == initiator_id {
            warn!("Admin {initiator_name} ({initiator_id}) attempted to delete themselves in chat {chat_id}");
            return Ok(RemovalOutcome::Refused(Refusal::TargetIsInitiator));
        }

        let member = match platform.get_member(chat_id, target.user_id).await {
            Ok(member) => member,
            Err(e) => {
                let requested = argument
                    .filter(|a| !a.trim().is_empty())
                    .unwrap_or(&target.label);
                warn!(
                    "Admin {initiator_name} ({initiator_id}) attempted to delete unknown user {requested} in chat {chat_id}: {e}"
                );
                return Ok(RemovalOutcome::Refused(Refusal::TargetNotInChat));
            }
        };

        if member.status.is_privileged() {
            warn!(
                "Admin {initiator_name} ({initiator_id}) attempted to delete administrator {} ({})",
                member.user.full_name(),
                member.user.id
            );
            return Ok(RemovalOutcome::Refused(Refusal::TargetIsPrivileged));
        }

        let display_name = display_name(&member);
        info!(
            "Admin {initiator_name} ({initiator_id}) is deleting user {display_name} ({}) in chat {chat_id}",
            member.user.id
        );

        if let Err(e) = self.kick(chat_id, target.user_id).await {
            error!(
                chat_id = chat_id.0,
                error = ?e,
                "Failed to delete user {} ({}) requested by {initiator_name} ({initiator_id})",
                member.user.full_name(),
                member.user.id
            );
            return Ok(RemovalOutcome::Failed(e.to_string()));
        }

        info!(
            "User {} ({}) removed by {initiator_name} ({initiator_id}) in chat {chat_id}",
            member.user.full_name(),
            member.user.id
        );
        Ok(RemovalOutcome::Removed {
            user_id: member.user.id,
            display_name,
        })
    }

    async fn kick(&self, chat_id: ChatId, user_id: UserId) -> Result<()> {
        self.platform.ban_member(chat_id, user_id).await?;
        self.platform.unban_member(chat_id, user_id, true).await
    }
}
