use std::{collections::HashMap, sync::RwLock};

use tracing::debug;

use crate::domain::{ChatId, UserId};

/// Usernames observed during the current process lifetime.
///
/// Keys are `(chat, lowercased username)`; the latest observation wins. Entries
/// never expire, so memory grows with the number of distinct users seen.
#[derive(Debug, Default)]
pub struct UsernameCache {
    inner: RwLock<HashMap<(ChatId, String), UserId>>,
}

impl UsernameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, chat_id: ChatId, username: &str, user_id: UserId) {
        let key = (chat_id, username.to_lowercase());
        {
            let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
            map.insert(key, user_id);
        }
        debug!(
            chat_id = chat_id.0,
            user_id = user_id.0,
            "Cached username @{username}"
        );
    }

    pub fn lookup(&self, chat_id: ChatId, username: &str) -> Option<UserId> {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.get(&(chat_id, username.to_lowercase())).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let cache = UsernameCache::new();
        cache.record(ChatId(-1), "Alice", UserId(42));
        assert_eq!(cache.lookup(ChatId(-1), "alice"), Some(UserId(42)));
        assert_eq!(cache.lookup(ChatId(-1), "ALICE"), Some(UserId(42)));
    }

    #[test]
    fn latest_observation_wins() {
        let cache = UsernameCache::new();
        cache.record(ChatId(-1), "bob", UserId(1));
        cache.record(ChatId(-1), "BoB", UserId(2));
        assert_eq!(cache.lookup(ChatId(-1), "bob"), Some(UserId(2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn entries_are_scoped_per_chat() {
        let cache = UsernameCache::new();
        cache.record(ChatId(-1), "carol", UserId(7));
        assert_eq!(cache.lookup(ChatId(-2), "carol"), None);
        assert_eq!(cache.lookup(ChatId(-1), "dave"), None);
    }
}
