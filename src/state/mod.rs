//! Conversation state persistence
//!
//! Keeps a history of processed turns per conversation.
//! Currently in-memory; any durable key-value store can implement the trait.

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::models::TurnRecord;
use crate::Result;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Trait for conversation persistence, keyed by conversation id
#[async_trait::async_trait]
pub trait ConversationStore: Send + Sync {
    async fn record_turn(&self, turn: TurnRecord) -> Result<()>;
    async fn load_turns(&self, conversation_id: &str) -> Result<Vec<TurnRecord>>;
}

/// In-memory conversation store for development.
/// Keeps only the latest `history_limit` turns of each conversation.
pub struct InMemoryConversationStore {
    turns_by_conversation: Arc<RwLock<HashMap<String, VecDeque<TurnRecord>>>>,
    history_limit: usize,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            turns_by_conversation: Arc::new(RwLock::new(HashMap::new())),
            history_limit: history_limit.max(1),
        }
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn record_turn(&self, turn: TurnRecord) -> Result<()> {
        let mut turns = self.turns_by_conversation.write().await;
        let history = turns
            .entry(turn.conversation_id.clone())
            .or_insert_with(VecDeque::new);

        history.push_back(turn);
        while history.len() > self.history_limit {
            history.pop_front();
        }
        Ok(())
    }

    async fn load_turns(&self, conversation_id: &str) -> Result<Vec<TurnRecord>> {
        let turns = self.turns_by_conversation.read().await;

        Ok(turns
            .get(conversation_id)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default())
    }
}
