use async_trait::async_trait;
use std::error::Error;
use tokio::sync::Mutex;

use crate::models::chat::Conversation;
use crate::storage::{decode_conversation, ChatPersistence};

/// In-process store holding the serialized document, so reads exercise the
/// same decode path as the durable backends. Used by tests and demo runs.
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the stored document directly, bypassing serialization. Lets tests
    /// stage corrupt payloads.
    pub async fn set_raw(&self, raw: impl Into<String>) {
        *self.slot.lock().await = Some(raw.into());
    }
}

#[async_trait]
impl ChatPersistence for MemoryStore {
    async fn get_conversation(&self) -> Conversation {
        match self.slot.lock().await.as_deref() {
            Some(raw) => decode_conversation(raw),
            None => Conversation::empty(),
        }
    }

    async fn save_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let encoded = serde_json::to_string(conversation)?;
        *self.slot.lock().await = Some(encoded);
        Ok(())
    }

    async fn reset_conversation(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.slot.lock().await = None;
        Ok(())
    }
}
