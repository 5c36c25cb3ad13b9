use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use shared::{
    domain::RemoteIndex,
    error::ServiceErrorBody,
    protocol::{
        FeedbackRequest, SendMessageRequest, SendMessageResponse, FEEDBACK_PATH, HISTORY_PATH,
        MESSAGE_PATH,
    },
};
use tracing::debug;
use url::Url;

use crate::error::{ChatError, Result};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The remote chat backend as seen by the session controller.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn post_message(&self, username: &str, message: &str) -> Result<SendMessageResponse>;
    /// Succeeds only when the service answered with status 200.
    async fn post_feedback(&self, index: RemoteIndex, feedback: bool) -> Result<()>;
    async fn get_history(&self) -> Result<Value>;
}

pub struct HttpChatService {
    http: Client,
    base_url: Url,
}

impl HttpChatService {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ChatError::Network(format!("failed to build http client: {err}")))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

/// Parses the service root. A trailing slash is added so that endpoint paths
/// are resolved below any path prefix instead of replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ChatError::Validation(
            "chat service url must not be empty".to_string(),
        ));
    }

    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&with_slash)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ChatError::Validation(format!(
            "unsupported chat service url scheme '{other}'"
        ))),
    }
}

async fn rejection(res: Response) -> ChatError {
    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();
    ChatError::Rejected {
        status,
        detail: ServiceErrorBody::detail_from_body(&body),
    }
}

async fn ensure_success(res: Response) -> Result<Response> {
    if res.status().is_success() {
        Ok(res)
    } else {
        Err(rejection(res).await)
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn post_message(&self, username: &str, message: &str) -> Result<SendMessageResponse> {
        let url = self.endpoint(MESSAGE_PATH)?;
        debug!(%url, username, "posting chat message");
        let res = self
            .http
            .post(url)
            .json(&SendMessageRequest {
                username: username.to_string(),
                message: message.to_string(),
            })
            .send()
            .await?;
        let body: SendMessageResponse = ensure_success(res).await?.json().await?;
        Ok(body)
    }

    async fn post_feedback(&self, index: RemoteIndex, feedback: bool) -> Result<()> {
        let url = self.endpoint(FEEDBACK_PATH)?;
        debug!(%url, index = index.0, feedback, "posting feedback");
        let res = self
            .http
            .post(url)
            .json(&FeedbackRequest { index, feedback })
            .send()
            .await?;
        if res.status() != StatusCode::OK {
            return Err(rejection(res).await);
        }
        Ok(())
    }

    async fn get_history(&self) -> Result<Value> {
        let url = self.endpoint(HISTORY_PATH)?;
        debug!(%url, "fetching chat history");
        let res = self.http.get(url).send().await?;
        let history: Value = ensure_success(res).await?.json().await?;
        Ok(history)
    }
}

#[cfg(test)]
#[path = "tests/protocol_client_tests.rs"]
mod tests;
