use serde::{Deserialize, Serialize};

/// Error body returned by the chat service on non-success statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub detail: String,
}

impl ServiceErrorBody {
    /// Extracts `detail` from a raw response body, falling back to the trimmed
    /// body text when it is not the expected JSON shape.
    pub fn detail_from_body(raw: &str) -> String {
        match serde_json::from_str::<ServiceErrorBody>(raw) {
            Ok(body) => body.detail,
            Err(_) => raw.trim().to_string(),
        }
    }
}
