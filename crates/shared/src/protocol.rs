use serde::{Deserialize, Serialize};

use crate::domain::{HistoryEntry, RemoteIndex};

pub const MESSAGE_PATH: &str = "chat/message";
pub const HISTORY_PATH: &str = "chat/history";
pub const FEEDBACK_PATH: &str = "chat/feedback";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub username: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub user_message: String,
    pub ai_response: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub index: RemoteIndex,
    pub feedback: bool,
}

/// The reference service wraps its stored rows as `{"history": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryDocument {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sender;

    #[test]
    fn feedback_request_serializes_plain_index() {
        let body = serde_json::to_value(FeedbackRequest {
            index: RemoteIndex(1),
            feedback: true,
        })
        .expect("serialize");
        assert_eq!(body, serde_json::json!({ "index": 1, "feedback": true }));
    }

    #[test]
    fn message_response_accepts_echoed_username() {
        let raw = r#"{"username":"Alice","user_message":"hi","ai_response":"hello"}"#;
        let parsed: SendMessageResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(parsed.username.as_deref(), Some("Alice"));
        assert_eq!(parsed.ai_response, "hello");
    }

    #[test]
    fn history_document_reads_optional_feedback() {
        let raw = r#"{"history":[
            {"user":"Alice","message":"hi"},
            {"user":"AI","message":"hello","feedback":false}
        ]}"#;
        let doc: HistoryDocument = serde_json::from_str(raw).expect("parse");
        assert_eq!(doc.history.len(), 2);
        assert_eq!(doc.history[0].sender(), Sender::User);
        assert_eq!(doc.history[1].sender(), Sender::Bot);
        assert_eq!(doc.history[1].feedback, Some(false));
    }
}
