use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;

use crate::{
    dispatch::{parse_command, MessageHandler},
    domain::IncomingMessage,
    errors::Error,
    removal::RemovalWorkflow,
    Result,
};

const COMMANDS: [&str; 2] = ["delete", "kick"];

/// `/delete <arg>` and `/kick <arg>`.
pub struct RemoveCommandHandler {
    workflow: Arc<RemovalWorkflow>,
    bot_username: Option<String>,
}

impl RemoveCommandHandler {
    pub fn new(workflow: Arc<RemovalWorkflow>, bot_username: Option<String>) -> Self {
        Self {
            workflow,
            bot_username,
        }
    }
}

#[async_trait]
impl MessageHandler for RemoveCommandHandler {
    fn name(&self) -> &'static str {
        "remove_command"
    }

    fn matches(&self, msg: &IncomingMessage) -> bool {
        msg.command_source().and_then(parse_command).is_some_and(|c| {
            COMMANDS.contains(&c.name.as_str()) && c.is_addressed_to(self.bot_username.as_deref())
        })
    }

    async fn handle(&self, msg: &IncomingMessage) -> Result<()> {
        let args = msg
            .command_source()
            .and_then(parse_command)
            .and_then(|c| c.args);
        self.workflow.run(msg, args.as_deref()).await?;
        Ok(())
    }
}

/// Plain text starting with the word "delete" (any case). Captions never match.
pub struct DeleteTextTrigger {
    workflow: Arc<RemovalWorkflow>,
    pattern: Regex,
}

impl DeleteTextTrigger {
    pub fn new(workflow: Arc<RemovalWorkflow>) -> Result<Self> {
        let pattern = Regex::new(r"(?i)^delete\b")
            .map_err(|e| Error::Config(format!("invalid delete trigger pattern: {e}")))?;
        Ok(Self { workflow, pattern })
    }
}

/// Everything after the first whitespace-delimited token.
fn trigger_argument(text: &str) -> Option<&str> {
    let (_, rest) = text.trim_start().split_once(char::is_whitespace)?;
    let rest = rest.trim_start();
    (!rest.is_empty()).then_some(rest)
}

#[async_trait]
impl MessageHandler for DeleteTextTrigger {
    fn name(&self) -> &'static str {
        "delete_text"
    }

    fn matches(&self, msg: &IncomingMessage) -> bool {
        msg.text.as_deref().is_some_and(|t| self.pattern.is_match(t))
    }

    async fn handle(&self, msg: &IncomingMessage) -> Result<()> {
        let argument = msg.text.as_deref().and_then(trigger_argument);
        self.workflow.run(msg, argument).await?;
        Ok(())
    }
}
