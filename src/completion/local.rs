use async_trait::async_trait;
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use regex::Regex;

use super::{ChatCompletion, CompletionError};
use crate::models::chat::Conversation;

/// Deterministic stand-in for the networked provider: earlier revisions of
/// the app shipped this responder and later swapped in the real API behind
/// the same contract. Stateless; ignores the prior conversation.
pub struct LocalResponder;

static GREETING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(bonjour|salut|hey|hello|hi|coucou)").unwrap());
static FAREWELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(au revoir|bye|adieu|à bientôt)").unwrap());

pub(crate) const GREETINGS: &[&str] = &[
    "Bonjour ! Comment puis-je vous aider aujourd'hui ?",
    "Bonjour ! Je suis ravi de vous rencontrer.",
    "Bonjour ! Que puis-je faire pour vous ?",
];

pub(crate) const FAREWELLS: &[&str] = &[
    "Au revoir ! Passez une excellente journée !",
    "À bientôt ! N'hésitez pas à revenir si vous avez d'autres questions.",
    "Au revoir et merci de votre visite !",
];

pub(crate) const DEFAULT_RESPONSES: &[&str] = &[
    "Je comprends. Pouvez-vous m'en dire plus ?",
    "C'est intéressant. Comment puis-je vous aider davantage ?",
    "Je vois. Que souhaitez-vous explorer ensuite ?",
    "Merci de partager cela. Que puis-je faire pour vous ?",
];

/// Ordered keyword rules; the first rule with a substring hit wins.
pub(crate) const KEYWORD_RULES: &[(&[&str], &[&str])] = &[
    (
        &["projet", "développement", "application"],
        &[
            "Je serais ravi d'en savoir plus sur votre projet.",
            "Parlons de vos besoins en développement.",
            "Quelles sont vos attentes pour ce projet ?",
        ],
    ),
    (
        &["prix", "coût", "tarif", "budget"],
        &[
            "Les tarifs varient selon les spécificités du projet. Pouvez-vous me donner plus de détails ?",
            "Je peux vous aider à comprendre nos différentes options tarifaires.",
            "Parlons de votre budget et de vos besoins.",
        ],
    ),
    (
        &["merci", "thanks"],
        &[
            "Je vous en prie ! N'hésitez pas si vous avez d'autres questions.",
            "Tout le plaisir est pour moi !",
            "C'est un plaisir de vous aider.",
        ],
    ),
];

impl LocalResponder {
    pub fn new() -> Self {
        Self
    }

    /// Pick the response set for an utterance: greeting and farewell prefixes
    /// first, then ordered keyword rules, then the default set.
    pub(crate) fn response_set(user_message: &str) -> &'static [&'static str] {
        let message = user_message.to_lowercase();
        let message = message.trim();

        if GREETING.is_match(message) {
            return GREETINGS;
        }
        if FAREWELL.is_match(message) {
            return FAREWELLS;
        }

        for (keywords, responses) in KEYWORD_RULES {
            if keywords.iter().any(|keyword| message.contains(keyword)) {
                return responses;
            }
        }

        DEFAULT_RESPONSES
    }
}

impl Default for LocalResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatCompletion for LocalResponder {
    async fn generate_response(
        &self,
        _conversation: &Conversation,
        user_message: &str,
    ) -> Result<String, CompletionError> {
        let set = Self::response_set(user_message);
        let reply = set
            .choose(&mut rand::thread_rng())
            .ok_or(CompletionError::NoChoices)?;
        Ok((*reply).to_string())
    }
}
