//! Optimistic-update reconciliation for the chat view.
//!
//! While a send is in flight the view shows the persisted conversation plus a
//! locally minted pair: the user message and an empty-content bot placeholder
//! (rendered as a loading indicator). The pair's ids are threaded into the
//! outgoing request, so the eventually-persisted messages carry the same ids.
//! Once the request settles the pair is dropped and the next render sources
//! purely from the revalidated conversation; identity-keyed replacement, so
//! no duplication and no flicker.

use crate::models::chat::{Conversation, Message, Sender};

/// The locally predicted message pair held while a send is in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingPair {
    pub user: Message,
    pub bot: Message,
}

/// State machine `idle -> pending(pair) -> idle`. At most one pending pair;
/// the UI prevents a second send while one is pending by clearing the input
/// synchronously on submit.
#[derive(Debug, Default)]
pub struct OptimisticUpdates {
    pending: Option<PendingPair>,
}

impl OptimisticUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the optimistic pair for a submitted text: a user message with a
    /// fresh id/timestamp and a bot placeholder with a fresh id and empty
    /// content. Stores the pair and returns it so the caller can thread the
    /// same ids into the request.
    pub fn create_optimistic_messages(&mut self, text: &str) -> PendingPair {
        let pair = PendingPair {
            user: Message::new(text, Sender::User),
            bot: Message::new("", Sender::Bot),
        };
        self.pending = Some(pair.clone());
        pair
    }

    /// The messages to render: persisted messages plus the pending pair while
    /// a send is in flight, persisted messages alone otherwise.
    pub fn all_messages(&self, conversation: &Conversation, sending: bool) -> Vec<Message> {
        let mut messages = conversation.messages.clone();
        if sending {
            if let Some(pair) = &self.pending {
                messages.push(pair.user.clone());
                messages.push(pair.bot.clone());
            }
        }
        messages
    }

    /// Drop the pending pair once the surrounding request lifecycle no longer
    /// reports a send in progress.
    pub fn reconcile(&mut self, sending: bool) {
        if !sending {
            self.pending = None;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn pair_is_visible_immediately_after_creation() {
        let mut updates = OptimisticUpdates::new();
        let conversation = Conversation::empty();

        let pair = updates.create_optimistic_messages("hi");
        assert_eq!(pair.user.content, "hi");
        assert_eq!(pair.user.sender, Sender::User);
        assert!(pair.bot.content.is_empty());
        assert_eq!(pair.bot.sender, Sender::Bot);
        assert_ne!(pair.user.id, pair.bot.id);

        let rendered = updates.all_messages(&conversation, true);
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].id, pair.user.id);
        assert_eq!(rendered[1].id, pair.bot.id);
    }

    #[test]
    fn pair_is_replaced_not_duplicated_once_the_send_settles() {
        let mut updates = OptimisticUpdates::new();
        let pair = updates.create_optimistic_messages("hi");

        // The request settles: the persisted conversation now carries the
        // same ids the pair was created with.
        let mut confirmed = Conversation::empty();
        confirmed.push(pair.user.clone());
        confirmed.push(Message::with_identity(
            "hello!",
            Sender::Bot,
            pair.bot.id,
            Utc::now(),
        ));

        updates.reconcile(false);
        assert!(!updates.is_pending());

        let rendered = updates.all_messages(&confirmed, false);
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].id, pair.user.id);
        assert_eq!(rendered[1].id, pair.bot.id);
        assert_eq!(rendered[1].content, "hello!");
    }

    #[test]
    fn pending_pair_is_hidden_while_no_send_is_in_flight() {
        let mut updates = OptimisticUpdates::new();
        updates.create_optimistic_messages("hi");

        // A non-send action is in flight; the pair must not leak into it.
        let rendered = updates.all_messages(&Conversation::empty(), false);
        assert!(rendered.is_empty());
    }

    #[test]
    fn reconcile_keeps_the_pair_while_still_sending() {
        let mut updates = OptimisticUpdates::new();
        updates.create_optimistic_messages("hi");

        updates.reconcile(true);
        assert!(updates.is_pending());

        updates.reconcile(false);
        assert!(!updates.is_pending());
    }
}
