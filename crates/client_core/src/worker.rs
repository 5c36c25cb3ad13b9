//! Single-writer session actor. The worker task owns the controller and runs
//! queued commands one at a time in the order they were issued, so turns and
//! feedback never interleave against a stale transcript.

use std::path::PathBuf;

use shared::protocol::HistoryDocument;
use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::debug;

use crate::{
    controller::{ChatSessionController, SessionEvent},
    error::{ChatError, Result},
    types::{Session, Transcript, TurnState},
};

const COMMAND_QUEUE_CAPACITY: usize = 64;

pub enum SessionCommand {
    SendMessage {
        username: String,
        draft: String,
        reply: oneshot::Sender<Result<Transcript>>,
    },
    SetDraft {
        draft: String,
    },
    SendDraft {
        reply: oneshot::Sender<Result<Transcript>>,
    },
    SubmitFeedback {
        index: usize,
        value: bool,
        reply: oneshot::Sender<Result<Transcript>>,
    },
    ExportHistory {
        reply: oneshot::Sender<Result<PathBuf>>,
    },
    FetchHistory {
        reply: oneshot::Sender<Result<HistoryDocument>>,
    },
    Snapshot {
        reply: oneshot::Sender<Session>,
    },
}

impl SessionCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::SendMessage { .. } => "send_message",
            Self::SetDraft { .. } => "set_draft",
            Self::SendDraft { .. } => "send_draft",
            Self::SubmitFeedback { .. } => "submit_feedback",
            Self::ExportHistory { .. } => "export_history",
            Self::FetchHistory { .. } => "fetch_history",
            Self::Snapshot { .. } => "snapshot",
        }
    }
}

#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    events: broadcast::Sender<SessionEvent>,
    turn_state: watch::Receiver<TurnState>,
}

/// Moves `controller` onto its own task. The task ends once every handle has
/// been dropped and the queue is drained.
pub fn spawn_session(controller: ChatSessionController) -> (SessionHandle, JoinHandle<()>) {
    let (commands, queue) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
    let handle = SessionHandle {
        commands,
        events: controller.event_sender(),
        turn_state: controller.watch_turn_state(),
    };
    let task = tokio::spawn(run_session(controller, queue));
    (handle, task)
}

async fn run_session(
    mut controller: ChatSessionController,
    mut queue: mpsc::Receiver<SessionCommand>,
) {
    while let Some(command) = queue.recv().await {
        debug!(command = command.name(), "processing session command");
        match command {
            SessionCommand::SendMessage {
                username,
                draft,
                reply,
            } => {
                let _ = reply.send(controller.send_message(&username, &draft).await);
            }
            SessionCommand::SetDraft { draft } => controller.set_draft(draft),
            SessionCommand::SendDraft { reply } => {
                let _ = reply.send(controller.send_draft().await);
            }
            SessionCommand::SubmitFeedback {
                index,
                value,
                reply,
            } => {
                let _ = reply.send(controller.submit_feedback(index, value).await);
            }
            SessionCommand::ExportHistory { reply } => {
                let _ = reply.send(controller.export_history().await);
            }
            SessionCommand::FetchHistory { reply } => {
                let _ = reply.send(controller.fetch_history().await);
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(controller.session().clone());
            }
        }
    }
    debug!("session worker stopped");
}

impl SessionHandle {
    async fn dispatch(&self, command: SessionCommand) -> Result<()> {
        let name = command.name();
        self.commands
            .send(command)
            .await
            .map_err(|_| ChatError::SessionClosed)?;
        debug!(command = name, "queued session command");
        Ok(())
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.dispatch(build(reply)).await?;
        response.await.map_err(|_| ChatError::SessionClosed)
    }

    pub async fn send_message(&self, username: &str, draft: &str) -> Result<Transcript> {
        let username = username.to_string();
        let draft = draft.to_string();
        self.request(|reply| SessionCommand::SendMessage {
            username,
            draft,
            reply,
        })
        .await?
    }

    pub async fn set_draft(&self, draft: impl Into<String>) -> Result<()> {
        self.dispatch(SessionCommand::SetDraft {
            draft: draft.into(),
        })
        .await
    }

    pub async fn send_draft(&self) -> Result<Transcript> {
        self.request(|reply| SessionCommand::SendDraft { reply })
            .await?
    }

    pub async fn submit_feedback(&self, index: usize, value: bool) -> Result<Transcript> {
        self.request(|reply| SessionCommand::SubmitFeedback {
            index,
            value,
            reply,
        })
        .await?
    }

    pub async fn export_history(&self) -> Result<PathBuf> {
        self.request(|reply| SessionCommand::ExportHistory { reply })
            .await?
    }

    pub async fn fetch_history(&self) -> Result<HistoryDocument> {
        self.request(|reply| SessionCommand::FetchHistory { reply })
            .await?
    }

    /// Current session state, observed after every previously queued command.
    pub async fn snapshot(&self) -> Result<Session> {
        self.request(|reply| SessionCommand::Snapshot { reply }).await
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn turn_state(&self) -> watch::Receiver<TurnState> {
        self.turn_state.clone()
    }
}

#[cfg(test)]
#[path = "tests/worker_tests.rs"]
mod tests;
