//! Pure transcript transitions. Every operation takes a snapshot and returns
//! a new one; the input is never touched, and publishing the result is the
//! caller's job.

use std::sync::Arc;

use crate::{
    error::{ChatError, Result},
    types::{Message, Sender, Transcript},
};

pub struct ConversationStore;

impl ConversationStore {
    pub fn seed(greeting: impl Into<String>) -> Transcript {
        Transcript::from_entries(vec![Arc::new(Message::bot(greeting))])
    }

    /// Appends one turn as `[User(user_text), Bot(bot_text)]`.
    pub fn append(transcript: &Transcript, user_text: &str, bot_text: &str) -> Result<Transcript> {
        if user_text.trim().is_empty() || bot_text.trim().is_empty() {
            return Err(ChatError::Validation(
                "turn requires both a user message and a reply".to_string(),
            ));
        }

        let mut entries = Vec::with_capacity(transcript.len() + 2);
        entries.extend(transcript.entries().iter().cloned());
        entries.push(Arc::new(Message::user(user_text)));
        entries.push(Arc::new(Message::bot(bot_text)));
        Ok(Transcript::from_entries(entries))
    }

    /// Checks that `index` names a bot reply other than the greeting.
    pub fn check_feedback_target(transcript: &Transcript, index: usize) -> Result<&Message> {
        let message = transcript.get(index).ok_or(ChatError::OutOfRange {
            index,
            len: transcript.len(),
        })?;
        if index == 0 || message.sender != Sender::Bot {
            return Err(ChatError::InvalidTarget { index });
        }
        Ok(message)
    }

    /// Sets the rating on one bot reply. An existing rating is overwritten;
    /// callers that want rate-once semantics check `Message::is_rated` first.
    pub fn set_feedback(transcript: &Transcript, index: usize, value: bool) -> Result<Transcript> {
        let target = Self::check_feedback_target(transcript, index)?;
        let updated = Arc::new(Message {
            feedback: Some(value),
            ..target.clone()
        });

        let entries = transcript
            .entries()
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                if position == index {
                    Arc::clone(&updated)
                } else {
                    Arc::clone(entry)
                }
            })
            .collect();
        Ok(Transcript::from_entries(entries))
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
