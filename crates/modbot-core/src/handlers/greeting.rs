use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    dispatch::{parse_command, MessageHandler},
    domain::IncomingMessage,
    platform::ChatPlatform,
    Result,
};

pub const GREETING: &str = "Бот работает ✅";

/// Answers `/start` with a fixed acknowledgement.
pub struct GreetingHandler {
    platform: Arc<dyn ChatPlatform>,
    bot_username: Option<String>,
}

impl GreetingHandler {
    pub fn new(platform: Arc<dyn ChatPlatform>, bot_username: Option<String>) -> Self {
        Self {
            platform,
            bot_username,
        }
    }
}

#[async_trait]
impl MessageHandler for GreetingHandler {
    fn name(&self) -> &'static str {
        "start"
    }

    fn matches(&self, msg: &IncomingMessage) -> bool {
        msg.command_source()
            .and_then(parse_command)
            .is_some_and(|c| c.name == "start" && c.is_addressed_to(self.bot_username.as_deref()))
    }

    async fn handle(&self, msg: &IncomingMessage) -> Result<()> {
        self.platform
            .send_text(msg.message.chat_id, GREETING)
            .await?;
        Ok(())
    }
}
