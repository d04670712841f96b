//! Conversation memory shared across reasoning turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "User"),
            Role::Agent => write!(f, "Agent"),
        }
    }
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only conversation log, one session per process lifetime.
///
/// Appends are serialized by an internal mutex held only for the append;
/// `as_context` returns a snapshot. `max_turns` caps growth by evicting the
/// oldest turns at append time. `None`, the shipped default, keeps every
/// turn for the life of the process.
pub struct ConversationMemory {
    turns: Mutex<Vec<Turn>>,
    max_turns: Option<usize>,
}

impl ConversationMemory {
    pub fn new(max_turns: Option<usize>) -> Self {
        Self {
            turns: Mutex::new(Vec::new()),
            max_turns,
        }
    }

    /// Append a turn, evicting the oldest if the cap is exceeded.
    pub fn append(&self, role: Role, text: impl Into<String>) {
        let mut turns = self.turns.lock().unwrap();

        turns.push(Turn {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        });

        if let Some(cap) = self.max_turns {
            let excess = turns.len().saturating_sub(cap);
            if excess > 0 {
                turns.drain(..excess);
                tracing::debug!("Evicted {} oldest turn(s) (cap: {})", excess, cap);
            }
        }
    }

    /// Snapshot of all turns in chronological order.
    pub fn as_context(&self) -> Vec<Turn> {
        self.turns.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.turns.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.lock().unwrap().is_empty()
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(None)
    }
}
