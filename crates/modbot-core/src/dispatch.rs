//! Priority-ordered message dispatch.
//!
//! Handlers are tried from highest to lowest priority. The first matching
//! non-passive handler claims the message; passive handlers (observers) run
//! whenever they match, claimed or not.

use std::{cmp::Reverse, sync::Arc};

use async_trait::async_trait;
use tracing::error;

use crate::{domain::IncomingMessage, Result};

#[async_trait]
pub trait MessageHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn priority(&self) -> i32 {
        0
    }

    /// Passive handlers never claim a message.
    fn is_passive(&self) -> bool {
        false
    }

    fn matches(&self, msg: &IncomingMessage) -> bool;

    async fn handle(&self, msg: &IncomingMessage) -> Result<()>;
}

#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<Arc<dyn MessageHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ties keep registration order.
    pub fn register(&mut self, handler: Arc<dyn MessageHandler>) -> &mut Self {
        self.handlers.push(handler);
        self.handlers.sort_by_key(|h| Reverse(h.priority()));
        self
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Run every applicable handler; returns the names of those that ran.
    ///
    /// Handler failures are logged and never propagated.
    pub async fn dispatch(&self, msg: &IncomingMessage) -> Vec<&'static str> {
        let mut claimed = false;
        let mut ran = Vec::new();

        for handler in &self.handlers {
            let passive = handler.is_passive();
            if (!passive && claimed) || !handler.matches(msg) {
                continue;
            }
            if !passive {
                claimed = true;
            }

            ran.push(handler.name());
            if let Err(e) = handler.handle(msg).await {
                error!(
                    handler = handler.name(),
                    chat_id = msg.message.chat_id.0,
                    "handler failed: {e}"
                );
            }
        }

        ran
    }
}

/// A `/command@botname args` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lowercased, without the leading slash.
    pub name: String,
    /// `botname` from `/cmd@botname`, if any.
    pub mention: Option<String>,
    /// Trimmed remainder; `None` when empty.
    pub args: Option<String>,
}

impl ParsedCommand {
    /// True if the command carries no mention or mentions `bot_username`.
    pub fn is_addressed_to(&self, bot_username: Option<&str>) -> bool {
        match (self.mention.as_deref(), bot_username) {
            (None, _) => true,
            (Some(m), Some(me)) => m.eq_ignore_ascii_case(me),
            (Some(_), None) => false,
        }
    }
}

pub fn parse_command(text: &str) -> Option<ParsedCommand> {
    let text = text.trim();
    let body = text.strip_prefix('/')?;

    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = body.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();

    let (name, mention) = match first.split_once('@') {
        Some((name, mention)) => (name, Some(mention.to_string())),
        None => (first, None),
    };
    if name.is_empty() {
        return None;
    }

    Some(ParsedCommand {
        name: name.to_lowercase(),
        mention,
        args: (!rest.is_empty()).then(|| rest.to_string()),
    })
}
