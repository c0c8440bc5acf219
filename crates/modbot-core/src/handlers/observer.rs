use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    dispatch::MessageHandler, domain::IncomingMessage, username_cache::UsernameCache, Result,
};

/// Remembers `@username -> id` for every sender that has a username.
pub struct UsernameObserver {
    usernames: Arc<UsernameCache>,
}

impl UsernameObserver {
    pub fn new(usernames: Arc<UsernameCache>) -> Self {
        Self { usernames }
    }
}

#[async_trait]
impl MessageHandler for UsernameObserver {
    fn name(&self) -> &'static str {
        "username_observer"
    }

    fn priority(&self) -> i32 {
        -100
    }

    fn is_passive(&self) -> bool {
        true
    }

    fn matches(&self, msg: &IncomingMessage) -> bool {
        msg.chat.is_some()
            && msg
                .from
                .as_ref()
                .is_some_and(|u| u.username.as_deref().is_some_and(|n| !n.is_empty()))
    }

    async fn handle(&self, msg: &IncomingMessage) -> Result<()> {
        let (Some(chat), Some(user)) = (msg.chat.as_ref(), msg.from.as_ref()) else {
            return Ok(());
        };
        if let Some(username) = user.username.as_deref() {
            self.usernames.record(chat.id, username, user.id);
        }
        Ok(())
    }
}
