use std::{path::PathBuf, sync::Arc};

use shared::{domain::RemoteIndex, protocol::HistoryDocument};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::{
    error::{ChatError, Result},
    export::{render_history, HistorySink, HISTORY_FILENAME},
    protocol_client::ChatService,
    store::ConversationStore,
    types::{Session, Transcript, TurnState},
};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A new transcript snapshot became current.
    TranscriptUpdated(Transcript),
    /// The pending input buffer was emptied after a completed turn.
    DraftCleared,
    HistoryExported(PathBuf),
    /// A recoverable failure the user should be told about.
    Notice(String),
}

/// Maps a local transcript position to the service's history index.
///
/// The service stores only exchanged turns, so the local greeting at 0 has no
/// remote counterpart and every other entry sits one position lower remotely.
pub fn remote_feedback_index(index: usize) -> Result<RemoteIndex> {
    if index == 0 {
        return Err(ChatError::InvalidTarget { index });
    }
    let remote = i64::try_from(index - 1).map_err(|_| ChatError::InvalidTarget { index })?;
    Ok(RemoteIndex(remote))
}

pub struct ChatSessionController {
    service: Arc<dyn ChatService>,
    sink: Arc<dyn HistorySink>,
    session: Session,
    turn_state: watch::Sender<TurnState>,
    events: broadcast::Sender<SessionEvent>,
}

impl ChatSessionController {
    pub fn new(
        service: Arc<dyn ChatService>,
        sink: Arc<dyn HistorySink>,
        username: impl Into<String>,
        greeting: impl Into<String>,
    ) -> Self {
        let session = Session::new(username, ConversationStore::seed(greeting));
        Self::with_session(service, sink, session)
    }

    pub fn with_session(
        service: Arc<dyn ChatService>,
        sink: Arc<dyn HistorySink>,
        session: Session,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (turn_state, _) = watch::channel(TurnState::Idle);
        Self {
            service,
            sink,
            session,
            turn_state,
            events,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transcript(&self) -> &Transcript {
        &self.session.transcript
    }

    pub fn turn_state(&self) -> TurnState {
        *self.turn_state.borrow()
    }

    pub fn watch_turn_state(&self) -> watch::Receiver<TurnState> {
        self.turn_state.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn event_sender(&self) -> broadcast::Sender<SessionEvent> {
        self.events.clone()
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.session.draft = draft.into();
    }

    /// Sends the buffered draft as the session's user.
    pub async fn send_draft(&mut self) -> Result<Transcript> {
        let username = self.session.username.clone();
        let draft = self.session.draft.clone();
        self.send_message(&username, &draft).await
    }

    /// Runs one turn. The transcript and draft only change once the service
    /// has answered successfully.
    pub async fn send_message(&mut self, username: &str, draft: &str) -> Result<Transcript> {
        if username.trim().is_empty() || draft.trim().is_empty() {
            debug!("rejected turn with missing username or message");
            return Err(ChatError::missing_input());
        }

        self.turn_state.send_replace(TurnState::AwaitingResponse);
        let outcome = self.service.post_message(username, draft).await;
        self.turn_state.send_replace(TurnState::Idle);

        let reply = outcome.map_err(|err| self.report("send message", err))?;
        let next = ConversationStore::append(
            &self.session.transcript,
            &reply.user_message,
            &reply.ai_response,
        )
        .map_err(|err| {
            let err = match err {
                ChatError::Validation(reason) => ChatError::MalformedResponse(reason),
                other => other,
            };
            self.report("send message", err)
        })?;

        self.session.transcript = next.clone();
        self.session.draft.clear();
        let _ = self.events.send(SessionEvent::DraftCleared);
        info!(username, transcript_len = next.len(), "turn completed");
        self.publish(next.clone());
        Ok(next)
    }

    /// Rates the bot reply at `index` of the current transcript. Each reply
    /// can be rated once; the local rating is only recorded after the service
    /// has accepted it.
    pub async fn submit_feedback(&mut self, index: usize, value: bool) -> Result<Transcript> {
        let target = ConversationStore::check_feedback_target(&self.session.transcript, index)?;
        if target.is_rated() {
            return Err(ChatError::AlreadyRated { index });
        }
        let remote_index = remote_feedback_index(index)?;

        self.service
            .post_feedback(remote_index, value)
            .await
            .map_err(|err| self.report("submit feedback", err))?;

        let next = ConversationStore::set_feedback(&self.session.transcript, index, value)?;
        self.session.transcript = next.clone();
        info!(index, remote_index = remote_index.0, feedback = value, "feedback recorded");
        self.publish(next.clone());
        Ok(next)
    }

    pub async fn export_history(&self) -> Result<PathBuf> {
        let history = self
            .service
            .get_history()
            .await
            .map_err(|err| self.report("export history", err))?;
        let rendered = render_history(&history).map_err(|err| self.report("export history", err))?;
        let path = self
            .sink
            .save(HISTORY_FILENAME, &rendered)
            .await
            .map_err(|err| self.report("export history", err))?;

        let _ = self.events.send(SessionEvent::HistoryExported(path.clone()));
        Ok(path)
    }

    /// Typed view of the service's stored history.
    pub async fn fetch_history(&self) -> Result<HistoryDocument> {
        let history = self
            .service
            .get_history()
            .await
            .map_err(|err| self.report("fetch history", err))?;
        serde_json::from_value(history).map_err(|err| {
            self.report(
                "fetch history",
                ChatError::MalformedResponse(err.to_string()),
            )
        })
    }

    fn publish(&self, transcript: Transcript) {
        let _ = self.events.send(SessionEvent::TranscriptUpdated(transcript));
    }

    fn report(&self, action: &str, err: ChatError) -> ChatError {
        warn!(action, error = %err, "chat operation failed");
        let _ = self
            .events
            .send(SessionEvent::Notice(format!("failed to {action}: {err}")));
        err
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
