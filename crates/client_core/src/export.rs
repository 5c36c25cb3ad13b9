use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::error::{ChatError, Result};

pub const HISTORY_FILENAME: &str = "chat_history.txt";

/// Destination for exported history, e.g. a download folder.
#[async_trait]
pub trait HistorySink: Send + Sync {
    /// Returns the location the payload was written to.
    async fn save(&self, filename: &str, contents: &str) -> Result<PathBuf>;
}

/// Pretty-prints the history document with two-space indentation.
pub fn render_history(history: &Value) -> Result<String> {
    serde_json::to_string_pretty(history)
        .map_err(|err| ChatError::Export(format!("failed to render history: {err}")))
}

/// Writes exports into a directory. The payload goes to a temporary sibling
/// first and is renamed into place, so a failed export never leaves a
/// truncated file behind.
pub struct DirectoryHistorySink {
    dir: PathBuf,
}

impl DirectoryHistorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl HistorySink for DirectoryHistorySink {
    async fn save(&self, filename: &str, contents: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|err| {
            ChatError::Export(format!(
                "failed to create export directory '{}': {err}",
                self.dir.display()
            ))
        })?;

        let target = self.dir.join(filename);
        let staging = self.dir.join(format!(".{filename}.partial"));
        if let Err(err) = tokio::fs::write(&staging, contents.as_bytes()).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(ChatError::Export(format!(
                "failed to write '{}': {err}",
                staging.display()
            )));
        }
        if let Err(err) = tokio::fs::rename(&staging, &target).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(ChatError::Export(format!(
                "failed to move export into '{}': {err}",
                target.display()
            )));
        }

        info!(path = %target.display(), bytes = contents.len(), "chat history exported");
        Ok(target)
    }
}

#[cfg(test)]
#[path = "tests/export_tests.rs"]
mod tests;
