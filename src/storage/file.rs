use async_trait::async_trait;
use log::error;
use std::error::Error;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::cli::Args;
use crate::models::chat::Conversation;
use crate::storage::{decode_conversation, ChatPersistence};

/// File-backed store: the whole conversation lives in one JSON document named
/// after the storage key inside the storage directory.
pub struct FileStore {
    directory: PathBuf,
    key: String,
}

impl FileStore {
    pub fn new(args: Args) -> Self {
        Self {
            directory: PathBuf::from(args.storage_path),
            key: args.storage_key,
        }
    }

    #[cfg(test)]
    pub fn at(directory: PathBuf, key: impl Into<String>) -> Self {
        Self {
            directory,
            key: key.into(),
        }
    }

    fn document_path(&self) -> PathBuf {
        self.directory.join(format!("{}.json", self.key))
    }
}

#[async_trait]
impl ChatPersistence for FileStore {
    async fn get_conversation(&self) -> Conversation {
        let raw = match tokio::fs::read_to_string(self.document_path()).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Conversation::empty(),
            Err(e) => {
                error!("Error reading from storage: {}", e);
                return Conversation::empty();
            }
        };

        decode_conversation(&raw)
    }

    async fn save_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        tokio::fs::create_dir_all(&self.directory).await?;
        let encoded = serde_json::to_string(conversation)?;
        tokio::fs::write(self.document_path(), encoded).await?;
        Ok(())
    }

    async fn reset_conversation(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        match tokio::fs::remove_file(self.document_path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Box::new(e)),
        }
    }
}
