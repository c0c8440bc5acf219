//! In-memory `ChatPlatform` used by unit tests.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;

use crate::{
    domain::{
        ChatId, ChatInfo, ChatMember, IncomingMessage, MemberStatus, MessageId, MessageRef,
        UserId, UserProfile,
    },
    errors::Error,
    platform::ChatPlatform,
    Result,
};

pub const CHAT: ChatId = ChatId(-100);
pub const BOT: UserId = UserId(999);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    GetMember(UserId),
    Ban(UserId),
    Unban { user: UserId, only_if_banned: bool },
    Reply(String),
    Send(String),
}

pub struct FakePlatform {
    me: UserProfile,
    members: Mutex<HashMap<UserId, ChatMember>>,
    ban_error: Option<String>,
    unban_error: Option<String>,
    calls: Mutex<Vec<Call>>,
}

pub fn profile(id: i64, first: &str, username: Option<&str>) -> UserProfile {
    UserProfile {
        id: UserId(id),
        first_name: first.to_string(),
        last_name: None,
        username: username.map(str::to_string),
    }
}

pub fn message(from: Option<UserProfile>, text: &str) -> IncomingMessage {
    IncomingMessage {
        message: MessageRef {
            chat_id: CHAT,
            message_id: MessageId(1),
        },
        chat: Some(ChatInfo {
            id: CHAT,
            title: Some("test chat".to_string()),
        }),
        from,
        text: Some(text.to_string()),
        caption: None,
        reply_to_author: None,
    }
}

/// A media message carrying `caption` and no text.
pub fn captioned(from: Option<UserProfile>, caption: &str) -> IncomingMessage {
    let mut msg = message(from, "");
    msg.text = None;
    msg.caption = Some(caption.to_string());
    msg
}

impl FakePlatform {
    /// A chat where the bot is an administrator allowed to remove members.
    pub fn new() -> Self {
        let me = profile(BOT.0, "ModBot", Some("mod_bot"));
        let fake = Self {
            me: me.clone(),
            members: Mutex::new(HashMap::new()),
            ban_error: None,
            unban_error: None,
            calls: Mutex::new(Vec::new()),
        };
        fake.add_member(me, MemberStatus::Administrator, true);
        fake
    }

    pub fn with_ban_error(mut self, msg: &str) -> Self {
        self.ban_error = Some(msg.to_string());
        self
    }

    pub fn with_unban_error(mut self, msg: &str) -> Self {
        self.unban_error = Some(msg.to_string());
        self
    }

    pub fn add_member(&self, user: UserProfile, status: MemberStatus, can_restrict: bool) {
        let id = user.id;
        self.members.lock().unwrap().insert(
            id,
            ChatMember {
                user,
                status,
                can_restrict_members: can_restrict,
            },
        );
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Ban/unban calls only.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Ban(_) | Call::Unban { .. }))
            .collect()
    }

    pub fn replies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Reply(t) | Call::Send(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn self_identity(&self) -> Result<UserProfile> {
        Ok(self.me.clone())
    }

    async fn get_member(&self, chat: ChatId, user: UserId) -> Result<ChatMember> {
        self.push(Call::GetMember(user));
        if chat != CHAT {
            return Err(Error::BadRequest("chat not found".to_string()));
        }
        self.members
            .lock()
            .unwrap()
            .get(&user)
            .cloned()
            .ok_or_else(|| Error::BadRequest("user not found".to_string()))
    }

    async fn ban_member(&self, _chat: ChatId, user: UserId) -> Result<()> {
        self.push(Call::Ban(user));
        match &self.ban_error {
            Some(msg) => Err(Error::BadRequest(msg.clone())),
            None => Ok(()),
        }
    }

    async fn unban_member(&self, _chat: ChatId, user: UserId, only_if_banned: bool) -> Result<()> {
        self.push(Call::Unban {
            user,
            only_if_banned,
        });
        match &self.unban_error {
            Some(msg) => Err(Error::BadRequest(msg.clone())),
            None => Ok(()),
        }
    }

    async fn reply(&self, to: MessageRef, html: &str) -> Result<MessageRef> {
        self.push(Call::Reply(html.to_string()));
        Ok(to)
    }

    async fn send_text(&self, chat: ChatId, html: &str) -> Result<MessageRef> {
        self.push(Call::Send(html.to_string()));
        Ok(MessageRef {
            chat_id: chat,
            message_id: MessageId(2),
        })
    }
}
