pub mod controller;
pub mod error;
pub mod export;
pub mod protocol_client;
pub mod store;
pub mod types;
pub mod worker;

pub use controller::{remote_feedback_index, ChatSessionController, SessionEvent};
pub use error::{ChatError, Result};
pub use export::{render_history, DirectoryHistorySink, HistorySink, HISTORY_FILENAME};
pub use protocol_client::{ChatService, HttpChatService, DEFAULT_REQUEST_TIMEOUT};
pub use store::ConversationStore;
pub use types::{Message, Sender, Session, Transcript, TurnState, DEFAULT_GREETING};
pub use worker::{spawn_session, SessionCommand, SessionHandle};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
