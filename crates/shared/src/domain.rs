use serde::{Deserialize, Serialize};

/// Position in the service's stored history, which has no greeting entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteIndex(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// One row of the service's stored history. `user` is either the username
/// that sent the message or `"AI"` for generated replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub user: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<bool>,
}

impl HistoryEntry {
    pub const AI_USER: &'static str = "AI";

    pub fn sender(&self) -> Sender {
        if self.user == Self::AI_USER {
            Sender::Bot
        } else {
            Sender::User
        }
    }
}
