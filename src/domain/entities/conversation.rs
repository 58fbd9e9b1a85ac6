use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_GREETING: &str =
    "Hello!! I am your helpful assistant. How can I help you today??";

/// A single chat turn. Turns are never edited once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    role: TurnRole,
    content: String,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_error: bool,
}

impl ConversationTurn {
    fn new(role: TurnRole, content: impl Into<String>, is_error: bool) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
            is_error,
        }
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// Append-only record of one session's chat, seeded with the greeting.
///
/// Insertion order is the display order. There is no way to remove or
/// rewrite a turn; the transcript lives and dies with its session.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![ConversationTurn::new(TurnRole::Assistant, greeting, false)],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &ConversationTurn {
        self.push(ConversationTurn::new(TurnRole::User, content, false))
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> &ConversationTurn {
        self.push(ConversationTurn::new(TurnRole::Assistant, content, false))
    }

    /// Records a failed answer as an assistant turn flagged as an error.
    pub fn push_error(&mut self, content: impl Into<String>) -> &ConversationTurn {
        self.push(ConversationTurn::new(TurnRole::Assistant, content, true))
    }

    fn push(&mut self, turn: ConversationTurn) -> &ConversationTurn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}
