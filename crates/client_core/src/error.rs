use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),
    #[error("chat service unreachable: {0}")]
    Network(String),
    #[error("chat service rejected the request with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
    #[error("malformed response from chat service: {0}")]
    MalformedResponse(String),
    #[error("message index {index} is out of range for a transcript of {len} messages")]
    OutOfRange { index: usize, len: usize },
    #[error("message {index} cannot receive feedback")]
    InvalidTarget { index: usize },
    #[error("message {index} has already been rated")]
    AlreadyRated { index: usize },
    #[error("failed to export chat history: {0}")]
    Export(String),
    #[error("chat session worker is no longer running")]
    SessionClosed,
}

impl ChatError {
    pub fn missing_input() -> Self {
        Self::Validation("missing username or message".to_string())
    }

    /// Failures caused by the service or the transport rather than by the
    /// caller's input. These are surfaced as notices, never as hard errors.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Rejected { .. } | Self::MalformedResponse(_)
        )
    }

    /// Whether the controller already announced this failure as a
    /// `SessionEvent::Notice` before returning it.
    pub fn is_reported(&self) -> bool {
        self.is_remote() || matches!(self, Self::Export(_))
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::MalformedResponse(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::Rejected {
                status: status.as_u16(),
                detail: err.to_string(),
            };
        }
        Self::Network(err.to_string())
    }
}

impl From<url::ParseError> for ChatError {
    fn from(err: url::ParseError) -> Self {
        Self::Validation(format!("invalid chat service url: {err}"))
    }
}
