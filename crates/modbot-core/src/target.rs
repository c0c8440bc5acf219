use crate::{
    domain::{ChatId, UserId, UserProfile},
    username_cache::UsernameCache,
};

pub const USAGE_MESSAGE: &str =
    "Команду нужно отправлять ответом на сообщение или указать ID/username.";
pub const USERNAME_NOT_FOUND_MESSAGE: &str =
    "Не нашёл пользователя по username; используйте ответ на сообщение или укажите числовой ID.";

/// A successfully resolved removal target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub user_id: UserId,
    /// How the initiator referred to the target.
    pub label: String,
}

/// Why a target could not be resolved; `Display` is the user-facing text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("{}", USAGE_MESSAGE)]
    Usage,
    #[error("{}", USERNAME_NOT_FOUND_MESSAGE)]
    UnknownUsername,
}

/// Pick the removal target from the reply context or from `argument`.
///
/// Reply context wins over any argument. Otherwise the trimmed argument must be
/// a (possibly negative) integer id or an `@username` seen earlier in `chat_id`.
pub fn resolve(
    cache: &UsernameCache,
    chat_id: ChatId,
    reply_to_author: Option<&UserProfile>,
    argument: Option<&str>,
) -> Result<Target, ResolveError> {
    if let Some(user) = reply_to_author {
        let label = match user.mention() {
            Some(mention) => format!("{} {mention}", user.full_name()),
            None => user.full_name(),
        };
        return Ok(Target {
            user_id: user.id,
            label,
        });
    }

    let arg = argument.map(str::trim).unwrap_or_default();
    if arg.is_empty() {
        return Err(ResolveError::Usage);
    }

    if let Some(id) = parse_user_id(arg) {
        return Ok(Target {
            user_id: id,
            label: arg.to_string(),
        });
    }

    if let Some(username) = arg.strip_prefix('@') {
        let username = username.trim();
        if username.is_empty() {
            return Err(ResolveError::Usage);
        }
        return match cache.lookup(chat_id, username) {
            Some(user_id) => Ok(Target {
                user_id,
                label: format!("@{username}"),
            }),
            None => Err(ResolveError::UnknownUsername),
        };
    }

    Err(ResolveError::Usage)
}

/// An optional leading minus followed by ASCII digits only.
fn parse_user_id(arg: &str) -> Option<UserId> {
    let digits = arg.strip_prefix('-').unwrap_or(arg);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    arg.parse::<i64>().ok().map(UserId)
}
