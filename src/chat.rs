use std::sync::Arc;

use assist_lib::assistant::Conversation;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::sec::authn::session::SessionToken;

pub type SharedConversation = Arc<Mutex<Conversation>>;

/// in memory conversations keyed by the session that owns them
#[derive(Debug)]
pub struct ChatStore {
    conversations: DashMap<SessionToken, SharedConversation>,
    history_limit: usize,
}

impl ChatStore {
    pub fn new(history_limit: usize) -> Self {
        ChatStore {
            conversations: DashMap::new(),
            history_limit,
        }
    }

    /// returns the conversation for the session, creating an empty one if
    /// needed. the map lock is released before this returns
    pub fn get_or_create(&self, token: &SessionToken) -> SharedConversation {
        if let Some(found) = self.conversations.get(token) {
            return found.value().clone();
        }

        self.conversations.entry(token.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Conversation::new(self.history_limit))))
            .value()
            .clone()
    }

    pub fn remove(&self, token: &SessionToken) -> bool {
        self.conversations.remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }
}
