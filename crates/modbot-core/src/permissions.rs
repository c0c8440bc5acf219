//! Fail-closed permission checks: any platform failure means "not allowed".

use tracing::debug;

use crate::{
    domain::{ChatId, MemberStatus, UserId},
    platform::ChatPlatform,
};

/// True iff `user_id` is an administrator or the owner of `chat_id`.
pub async fn is_admin(platform: &dyn ChatPlatform, user_id: UserId, chat_id: ChatId) -> bool {
    match platform.get_member(chat_id, user_id).await {
        Ok(member) => member.status.is_privileged(),
        Err(e) => {
            debug!(chat_id = chat_id.0, user_id = user_id.0, "admin check failed: {e}");
            false
        }
    }
}

/// True iff the bot is an administrator of `chat_id` with the right to restrict members.
pub async fn can_remove_members(platform: &dyn ChatPlatform, chat_id: ChatId) -> bool {
    let me = match platform.self_identity().await {
        Ok(me) => me,
        Err(e) => {
            debug!(chat_id = chat_id.0, "bot identity lookup failed: {e}");
            return false;
        }
    };

    match platform.get_member(chat_id, me.id).await {
        Ok(member) => member.status == MemberStatus::Administrator && member.can_restrict_members,
        Err(e) => {
            debug!(chat_id = chat_id.0, "bot membership lookup failed: {e}");
            false
        }
    }
}
