use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message. Serialized lowercase to match the stored schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single chat message. Immutable once created; only a conversation reset
/// discards messages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message with a fresh id and the current time.
    pub fn new(content: impl Into<String>, sender: Sender) -> Self {
        Self::with_identity(content, sender, Uuid::new_v4(), Utc::now())
    }

    /// Create a message with a caller-supplied id and timestamp. Used when a
    /// client-generated optimistic id must become the canonical one.
    pub fn with_identity(
        content: impl Into<String>,
        sender: Sender,
        id: Uuid,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            sender,
            timestamp,
        }
    }
}

/// An ordered conversation. Insertion order is chronological order; the list
/// only grows by append and is cleared as a whole on reset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Schema check applied to every conversation read back from storage.
    /// Typed deserialization already enforces uuid ids, known senders and
    /// RFC 3339 timestamps; the remaining rule is non-empty content.
    pub fn validate(&self) -> Result<(), String> {
        for message in &self.messages {
            if message.content.is_empty() {
                return Err(format!("message {} has empty content", message.id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_timestamp_as_rfc3339() {
        let message = Message::with_identity(
            "hello",
            Sender::User,
            Uuid::nil(),
            "2024-05-01T12:30:00Z".parse().unwrap(),
        );
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["sender"], "user");
        assert_eq!(json["timestamp"], "2024-05-01T12:30:00Z");
    }

    #[test]
    fn conversation_round_trips_through_json() {
        let mut conversation = Conversation::empty();
        conversation.push(Message::new("hello", Sender::User));
        conversation.push(Message::new("hi there", Sender::Bot));

        let encoded = serde_json::to_string(&conversation).unwrap();
        let decoded: Conversation = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, conversation);
    }

    #[test]
    fn unknown_sender_fails_to_parse() {
        let raw = r#"{"id":"7f7a0d2e-3b0a-4c66-9f0a-111111111111","content":"x","sender":"admin","timestamp":"2024-05-01T12:30:00Z"}"#;
        assert!(serde_json::from_str::<Message>(raw).is_err());
    }

    #[test]
    fn validate_rejects_empty_content() {
        let mut conversation = Conversation::empty();
        conversation.push(Message::new("", Sender::Bot));
        assert!(conversation.validate().is_err());
    }

    #[test]
    fn validate_accepts_well_formed_messages() {
        let mut conversation = Conversation::empty();
        conversation.push(Message::new("hello", Sender::User));
        assert!(conversation.validate().is_ok());
    }
}
