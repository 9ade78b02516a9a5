//! Conversation turns and transcript loading

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

/// Speaker of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Assistant,
}

/// One message exchanged in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
  pub role: Role,
  pub content: String,
}

impl ConversationTurn {
  pub fn user(content: impl Into<String>) -> Self {
    Self { role: Role::User, content: content.into() }
  }

  pub fn assistant(content: impl Into<String>) -> Self {
    Self { role: Role::Assistant, content: content.into() }
  }

  pub fn is_assistant(&self) -> bool {
    self.role == Role::Assistant
  }
}

/// The last `window` turns, or all of them when the history is shorter
pub fn recent(turns: &[ConversationTurn], window: usize) -> &[ConversationTurn] {
  &turns[turns.len().saturating_sub(window)..]
}

/// Most recent assistant turn, falling back to the last turn of any role
pub fn latest_reply(turns: &[ConversationTurn]) -> Option<&ConversationTurn> {
  turns.iter().rev().find(|turn| turn.is_assistant()).or_else(|| turns.last())
}

/// Load a transcript stored as a JSON array of turns
pub fn load_transcript<P: AsRef<Path>>(path: P) -> Result<Vec<ConversationTurn>> {
  let content = std::fs::read_to_string(path)?;
  let turns: Vec<ConversationTurn> = serde_json::from_str(&content)?;
  Ok(turns)
}
