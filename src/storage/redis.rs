use async_trait::async_trait;
use log::error;
use redis::{AsyncCommands, Client};
use std::error::Error;

use crate::cli::Args;
use crate::models::chat::Conversation;
use crate::storage::{decode_conversation, ChatPersistence};

/// Redis-backed store: the conversation JSON lives under a single prefixed key.
pub struct RedisStore {
    client: Client,
    key: String,
}

impl RedisStore {
    pub fn new(args: Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(Self {
            client: Client::open(args.storage_redis_url.as_str())?,
            key: format!("{}{}", args.storage_redis_prefix, args.storage_key),
        })
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }
}

#[async_trait]
impl ChatPersistence for RedisStore {
    async fn get_conversation(&self) -> Conversation {
        let mut conn = match self.get_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Error connecting to redis storage: {}", e);
                return Conversation::empty();
            }
        };

        let raw: Option<String> = match conn.get(&self.key).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error reading from redis storage: {}", e);
                return Conversation::empty();
            }
        };

        match raw {
            Some(raw) => decode_conversation(&raw),
            None => Conversation::empty(),
        }
    }

    async fn save_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut conn = self.get_connection().await?;
        let encoded = serde_json::to_string(conversation)?;
        let _: () = conn.set(&self.key, encoded).await?;
        Ok(())
    }

    async fn reset_conversation(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut conn = self.get_connection().await?;
        let _: () = conn.del(&self.key).await?;
        Ok(())
    }
}
