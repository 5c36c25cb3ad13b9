use client_core::{Message, Sender, Transcript};
use shared::protocol::HistoryDocument;

pub const BOT_LABEL: &str = "AI";

fn rating_suffix(index: usize, message: &Message) -> String {
    if message.sender != Sender::Bot || index == 0 {
        return String::new();
    }
    match message.feedback {
        Some(true) => "  [+]".to_string(),
        Some(false) => "  [-]".to_string(),
        None => format!("  (/up {index} | /down {index})"),
    }
}

pub fn format_message(index: usize, message: &Message, username: &str) -> String {
    let label = match message.sender {
        Sender::User => username,
        Sender::Bot => BOT_LABEL,
    };
    format!(
        "[{index}] {label}: {}{}",
        message.text,
        rating_suffix(index, message)
    )
}

pub fn format_transcript(transcript: &Transcript, username: &str) -> String {
    transcript
        .iter()
        .enumerate()
        .map(|(index, message)| format_message(index, message, username))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_history(document: &HistoryDocument) -> String {
    if document.history.is_empty() {
        return "(no stored history)".to_string();
    }
    document
        .history
        .iter()
        .map(|entry| {
            let rating = match entry.feedback {
                Some(true) => "  [+]",
                Some(false) => "  [-]",
                None => "",
            };
            format!("{}: {}{rating}", entry.user, entry.message)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
