//! Role-tagged chat messages

use serde::{Deserialize, Serialize};

/// One message of a conversation, serialized as `{"role": ..., "content": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum ChatMessage {
  System(String),
  User(String),
  Assistant(String),
}

impl ChatMessage {
  pub fn role(&self) -> &'static str {
    match self {
      Self::System(_) => "system",
      Self::User(_) => "user",
      Self::Assistant(_) => "assistant",
    }
  }

  pub fn content(&self) -> &str {
    match self {
      Self::System(content) | Self::User(content) | Self::Assistant(content) => content,
    }
  }

  pub fn is_system(&self) -> bool {
    matches!(self, Self::System(_))
  }
}
