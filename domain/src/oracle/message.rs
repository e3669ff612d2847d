//! Oracle conversation messages

use serde::{Deserialize, Serialize};

/// Role of a message sent to the oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A message in an oracle request (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Fold `system` messages into the next user turn.
///
/// Some providers reject the system role. Each run of system messages is
/// prefixed onto the following user message as `[System Instructions]: ...`;
/// a trailing run with no user message after it becomes a user message.
pub fn fold_system_messages(messages: &[Message]) -> Vec<Message> {
    let mut folded = Vec::with_capacity(messages.len());
    let mut pending: Vec<&str> = Vec::new();

    for message in messages {
        match message.role {
            Role::System => pending.push(&message.content),
            Role::User if !pending.is_empty() => {
                let instructions = pending.join("\n");
                pending.clear();
                folded.push(Message::user(format!(
                    "[System Instructions]: {}\n\n{}",
                    instructions, message.content
                )));
            }
            _ => folded.push(message.clone()),
        }
    }

    if !pending.is_empty() {
        folded.push(Message::user(format!(
            "[System Instructions]: {}",
            pending.join("\n")
        )));
    }

    folded
}
