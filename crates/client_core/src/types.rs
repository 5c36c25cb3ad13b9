use std::{ops::Index, sync::Arc};

pub use shared::domain::Sender;

pub const DEFAULT_GREETING: &str = "Hello, How can I help you?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub feedback: Option<bool>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            feedback: None,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            feedback: None,
        }
    }

    pub fn is_rated(&self) -> bool {
        self.feedback.is_some()
    }
}

/// Immutable snapshot of the conversation. Cloning is cheap: messages are
/// shared between snapshots, so entries that did not change between two
/// snapshots are the same allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Arc<[Arc<Message>]>,
}

impl Transcript {
    pub(crate) fn from_entries(messages: Vec<Arc<Message>>) -> Self {
        Self {
            messages: messages.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index).map(Arc::as_ref)
    }

    /// Shared handle to the entry at `index`, for identity checks across
    /// snapshots.
    pub fn entry(&self, index: usize) -> Option<&Arc<Message>> {
        self.messages.get(index)
    }

    pub(crate) fn entries(&self) -> &[Arc<Message>] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().map(Arc::as_ref)
    }

    /// Indices of bot replies that can still be rated. The greeting at index 0
    /// never qualifies.
    pub fn rateable_indices(&self) -> Vec<usize> {
        self.iter()
            .enumerate()
            .skip(1)
            .filter(|(_, message)| message.sender == Sender::Bot && !message.is_rated())
            .map(|(index, _)| index)
            .collect()
    }
}

/// Panics when `index` is out of range; use `Transcript::get` for indices
/// that have not been validated.
impl Index<usize> for Transcript {
    type Output = Message;

    fn index(&self, index: usize) -> &Self::Output {
        &self.messages[index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    AwaitingResponse,
}

/// Everything the controller owns for one conversation.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub draft: String,
    pub transcript: Transcript,
}

impl Session {
    pub fn new(username: impl Into<String>, transcript: Transcript) -> Self {
        Self {
            username: username.into(),
            draft: String::new(),
            transcript,
        }
    }
}
