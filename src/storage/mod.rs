mod file;
mod memory;
mod redis;

use async_trait::async_trait;
use log::{error, info};
use std::error::Error;
use std::sync::Arc;

use crate::cli::Args;
use crate::models::chat::Conversation;

pub use memory::MemoryStore;

/// Persistence boundary for the single stored conversation.
///
/// Reads never fail: missing, unreadable or schema-invalid data is downgraded
/// to an empty conversation so a corrupt store can never take the chat down.
/// Writes and resets propagate their errors.
#[async_trait]
pub trait ChatPersistence: Send + Sync {
    async fn get_conversation(&self) -> Conversation;

    async fn save_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    async fn reset_conversation(&self) -> Result<(), Box<dyn Error + Send + Sync>>;
}

pub fn create_persistence(
    args: &Args,
) -> Result<Arc<dyn ChatPersistence>, Box<dyn Error + Send + Sync>> {
    match args.storage_type.to_lowercase().as_str() {
        "file" => {
            let store = file::FileStore::new(args.clone());
            Ok(Arc::new(store))
        }
        "redis" => {
            let store = redis::RedisStore::new(args.clone())?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemoryStore::new())),
        _ => Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Unsupported storage type: {}", args.storage_type),
        ))),
    }
}

pub fn initialize_persistence(
    args: &Args,
) -> Result<Arc<dyn ChatPersistence>, Box<dyn Error + Send + Sync>> {
    info!(
        "Conversation will be stored in: {} under key {}",
        args.storage_type, args.storage_key
    );
    create_persistence(args)
}

/// Shared fail-open decode path for every backend: JSON parse failures and
/// schema violations are logged and yield an empty conversation.
pub(crate) fn decode_conversation(raw: &str) -> Conversation {
    let conversation: Conversation = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("Error parsing stored conversation: {}", e);
            return Conversation::empty();
        }
    };

    if let Err(e) = conversation.validate() {
        error!("Invalid data structure in storage: {}", e);
        return Conversation::empty();
    }

    conversation
}
