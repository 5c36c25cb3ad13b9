//! Fakes for the controller's collaborators.

use std::{collections::HashMap, path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::Value;
use shared::{
    domain::RemoteIndex,
    protocol::{FeedbackRequest, SendMessageResponse},
};
use tokio::sync::Mutex;

use crate::{
    error::{ChatError, Result},
    export::HistorySink,
    protocol_client::ChatService,
};

#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Network,
    Rejected(u16),
    Malformed,
}

impl Failure {
    fn to_error(self) -> ChatError {
        match self {
            Self::Network => ChatError::Network("connection refused".to_string()),
            Self::Rejected(status) => ChatError::Rejected {
                status,
                detail: "rejected by test service".to_string(),
            },
            Self::Malformed => {
                ChatError::MalformedResponse("missing field `ai_response`".to_string())
            }
        }
    }
}

pub struct FakeChatService {
    replies: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    fail_with: Option<Failure>,
    history: Value,
    pub messages: Arc<Mutex<Vec<(String, String)>>>,
    pub feedback: Arc<Mutex<Vec<FeedbackRequest>>>,
    pub history_calls: Arc<Mutex<u32>>,
}

impl FakeChatService {
    pub fn ok() -> Self {
        Self {
            replies: HashMap::new(),
            delays: HashMap::new(),
            fail_with: None,
            history: serde_json::json!({ "history": [] }),
            messages: Arc::new(Mutex::new(Vec::new())),
            feedback: Arc::new(Mutex::new(Vec::new())),
            history_calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing(failure: Failure) -> Self {
        let mut service = Self::ok();
        service.fail_with = Some(failure);
        service
    }

    pub fn with_reply(mut self, message: &str, reply: &str) -> Self {
        self.replies.insert(message.to_string(), reply.to_string());
        self
    }

    pub fn with_delay(mut self, message: &str, delay: Duration) -> Self {
        self.delays.insert(message.to_string(), delay);
        self
    }

    pub fn with_history(mut self, history: Value) -> Self {
        self.history = history;
        self
    }
}

#[async_trait]
impl ChatService for FakeChatService {
    async fn post_message(&self, username: &str, message: &str) -> Result<SendMessageResponse> {
        if let Some(delay) = self.delays.get(message) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(failure) = self.fail_with {
            return Err(failure.to_error());
        }
        self.messages
            .lock()
            .await
            .push((username.to_string(), message.to_string()));

        let ai_response = self
            .replies
            .get(message)
            .cloned()
            .unwrap_or_else(|| format!("echo: {message}"));
        Ok(SendMessageResponse {
            username: Some(username.to_string()),
            user_message: message.to_string(),
            ai_response,
        })
    }

    async fn post_feedback(&self, index: RemoteIndex, feedback: bool) -> Result<()> {
        if let Some(failure) = self.fail_with {
            return Err(failure.to_error());
        }
        self.feedback
            .lock()
            .await
            .push(FeedbackRequest { index, feedback });
        Ok(())
    }

    async fn get_history(&self) -> Result<Value> {
        *self.history_calls.lock().await += 1;
        if let Some(failure) = self.fail_with {
            return Err(failure.to_error());
        }
        Ok(self.history.clone())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub saved: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            saved: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }
}

#[async_trait]
impl HistorySink for RecordingSink {
    async fn save(&self, filename: &str, contents: &str) -> Result<PathBuf> {
        if self.fail {
            return Err(ChatError::Export("disk full".to_string()));
        }
        self.saved
            .lock()
            .await
            .push((filename.to_string(), contents.to_string()));
        Ok(PathBuf::from(filename))
    }
}
