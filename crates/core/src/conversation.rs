//! Conversation Memory
//!
//! A bounded, append-only log of the turns exchanged with the user. The log
//! keeps at most `2 * max_history` turns and evicts the oldest first.

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::fmt;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single role-tagged message, immutable once recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct ConversationLog {
    turns: VecDeque<Turn>,
    max_history: usize,
}

impl ConversationLog {
    /// Creates an empty log holding up to `max_history` user/assistant pairs.
    pub fn new(max_history: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_history * 2 + 1),
            max_history,
        }
    }

    /// Maximum number of turns retained.
    pub fn capacity(&self) -> usize {
        self.max_history * 2
    }

    /// Records a turn stamped with the current time, dropping the oldest
    /// turns once the bound is exceeded.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push_back(Turn {
            role,
            content: content.into(),
            timestamp: Local::now(),
        });
        while self.turns.len() > self.capacity() {
            self.turns.pop_front();
        }
    }

    /// Returns the last `n` turns in chronological order.
    pub fn recent(&self, n: usize) -> Vec<&Turn> {
        let skip = self.turns.len().saturating_sub(n);
        self.turns.iter().skip(skip).collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }
}
