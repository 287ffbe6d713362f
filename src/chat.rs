use chrono::Utc;
use log::info;
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

use crate::completion::ChatCompletion;
use crate::models::chat::{Conversation, Message, Sender};
use crate::storage::ChatPersistence;

/// Orchestrates one chat session: append the user message, fetch the bot
/// reply, append it, persist the result. Adapters are injected at startup;
/// there is no global service state.
#[derive(Clone)]
pub struct ChatService {
    persistence: Arc<dyn ChatPersistence>,
    completion: Arc<dyn ChatCompletion>,
}

impl ChatService {
    pub fn new(persistence: Arc<dyn ChatPersistence>, completion: Arc<dyn ChatCompletion>) -> Self {
        Self {
            persistence,
            completion,
        }
    }

    /// Send a user message and persist it together with the generated bot
    /// reply as one write.
    ///
    /// The caller supplies the user message identity and the bot reply id so
    /// that client-generated optimistic ids become the canonical ones. If the
    /// completion call fails nothing is persisted. The read-modify-write pair
    /// is not isolated: two overlapping sends against the same stored
    /// conversation are last-writer-wins.
    pub async fn send_message(
        &self,
        user_message: Message,
        response_id: Uuid,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut conversation = self.persistence.get_conversation().await;

        let reply = self
            .completion
            .generate_response(&conversation, &user_message.content)
            .await?;

        let bot_message = Message::with_identity(reply, Sender::Bot, response_id, Utc::now());

        info!(
            "Appending message pair {} / {} to the conversation",
            user_message.id, bot_message.id
        );

        conversation.push(user_message);
        conversation.push(bot_message);

        self.persistence.save_conversation(&conversation).await
    }

    pub async fn conversation(&self) -> Conversation {
        self.persistence.get_conversation().await
    }

    pub async fn reset(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        info!("Resetting the conversation");
        self.persistence.reset_conversation().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionError;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;

    struct CannedCompletion {
        reply: &'static str,
    }

    #[async_trait]
    impl ChatCompletion for CannedCompletion {
        async fn generate_response(
            &self,
            _conversation: &Conversation,
            _user_message: &str,
        ) -> Result<String, CompletionError> {
            Ok(self.reply.to_string())
        }
    }

    struct FailingCompletion;

    #[async_trait]
    impl ChatCompletion for FailingCompletion {
        async fn generate_response(
            &self,
            _conversation: &Conversation,
            _user_message: &str,
        ) -> Result<String, CompletionError> {
            Err(CompletionError::NoChoices)
        }
    }

    fn service_with(completion: Arc<dyn ChatCompletion>) -> (ChatService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (ChatService::new(store.clone(), completion), store)
    }

    #[tokio::test]
    async fn send_message_appends_exactly_the_two_messages() {
        let (service, _store) = service_with(Arc::new(CannedCompletion { reply: "hi back" }));

        let user_id = Uuid::new_v4();
        let response_id = Uuid::new_v4();
        let user_message = Message::with_identity("hello", Sender::User, user_id, Utc::now());

        service.send_message(user_message, response_id).await.unwrap();

        let conversation = service.conversation().await;
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[0].id, user_id);
        assert_eq!(conversation.messages[0].sender, Sender::User);
        assert_eq!(conversation.messages[0].content, "hello");
        assert_eq!(conversation.messages[1].id, response_id);
        assert_eq!(conversation.messages[1].sender, Sender::Bot);
        assert_eq!(conversation.messages[1].content, "hi back");
    }

    #[tokio::test]
    async fn completion_failure_persists_nothing() {
        let (service, _store) = service_with(Arc::new(FailingCompletion));

        let result = service
            .send_message(Message::new("hello", Sender::User), Uuid::new_v4())
            .await;

        assert!(result.is_err());
        assert!(service.conversation().await.is_empty());
    }

    #[tokio::test]
    async fn completion_sees_the_pre_update_conversation() {
        struct LenCountingCompletion;

        #[async_trait]
        impl ChatCompletion for LenCountingCompletion {
            async fn generate_response(
                &self,
                conversation: &Conversation,
                _user_message: &str,
            ) -> Result<String, CompletionError> {
                Ok(format!("history:{}", conversation.messages.len()))
            }
        }

        let (service, _store) = service_with(Arc::new(LenCountingCompletion));

        service
            .send_message(Message::new("first", Sender::User), Uuid::new_v4())
            .await
            .unwrap();
        service
            .send_message(Message::new("second", Sender::User), Uuid::new_v4())
            .await
            .unwrap();

        let conversation = service.conversation().await;
        // First call saw no history, second saw the first persisted pair.
        assert_eq!(conversation.messages[1].content, "history:0");
        assert_eq!(conversation.messages[3].content, "history:2");
    }

    #[tokio::test]
    async fn reset_clears_history() {
        let (service, _store) = service_with(Arc::new(CannedCompletion { reply: "ok" }));
        service
            .send_message(Message::new("hello", Sender::User), Uuid::new_v4())
            .await
            .unwrap();

        service.reset().await.unwrap();
        assert!(service.conversation().await.is_empty());
    }
}
