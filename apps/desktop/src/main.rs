use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    spawn_session, ChatError, ChatSessionController, DirectoryHistorySink, HttpChatService,
    SessionEvent, SessionHandle,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::RecvError},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod view;

use commands::{parse_command, PromptCommand, HELP};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    export_dir: Option<PathBuf>,
    #[arg(long, default_value = "client.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(&args.config);
    if let Some(server_url) = args.server_url {
        settings.service_url = server_url;
    }
    if let Some(username) = args.username {
        settings.username = username;
    }
    if let Some(export_dir) = args.export_dir {
        settings.export_dir = export_dir;
    }

    let service = HttpChatService::with_timeout(
        &settings.service_url,
        Duration::from_secs(settings.request_timeout_secs),
    )
    .with_context(|| format!("invalid chat service url '{}'", settings.service_url))?;
    info!(
        service_url = %service.base_url(),
        username = %settings.username,
        "starting chat session"
    );

    let controller = ChatSessionController::new(
        Arc::new(service),
        Arc::new(DirectoryHistorySink::new(&settings.export_dir)),
        settings.username.clone(),
        settings.greeting.clone(),
    );
    let (session, worker) = spawn_session(controller);
    let notices = tokio::spawn(print_notices(session.subscribe_events()));

    println!("Hi, {}", settings.username);
    print_transcript(&session).await?;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !run_command(&session, &settings.username, parse_command(&line)).await? {
            break;
        }
    }

    drop(session);
    worker.await.context("session worker panicked")?;
    notices.abort();
    Ok(())
}

/// Returns `false` once the user asked to leave.
async fn run_command(
    session: &SessionHandle,
    username: &str,
    command: PromptCommand,
) -> Result<bool> {
    let outcome = match command {
        PromptCommand::Quit => return Ok(false),
        PromptCommand::Empty => return Ok(true),
        PromptCommand::Help => {
            println!("{HELP}");
            return Ok(true);
        }
        PromptCommand::Invalid(reason) => {
            println!("{reason}");
            return Ok(true);
        }
        PromptCommand::Show => {
            print_transcript(session).await?;
            return Ok(true);
        }
        PromptCommand::Send(text) => {
            session.set_draft(text).await?;
            session.send_draft().await.map(|transcript| {
                let start = transcript.len().saturating_sub(2);
                for index in start..transcript.len() {
                    println!("{}", view::format_message(index, &transcript[index], username));
                }
            })
        }
        PromptCommand::Rate { index, positive } => {
            session.submit_feedback(index, positive).await.map(|transcript| {
                println!("{}", view::format_message(index, &transcript[index], username));
            })
        }
        PromptCommand::Export => session.export_history().await.map(|_| ()),
        PromptCommand::History => session
            .fetch_history()
            .await
            .map(|document| println!("{}", view::format_history(&document))),
    };

    match outcome {
        Ok(()) => Ok(true),
        Err(ChatError::SessionClosed) => Err(ChatError::SessionClosed.into()),
        Err(ChatError::Validation(_)) => {
            println!("Please enter both username and message");
            Ok(true)
        }
        // Already printed by the notice task.
        Err(err) if err.is_reported() => Ok(true),
        Err(err) => {
            println!("{err}");
            Ok(true)
        }
    }
}

async fn print_transcript(session: &SessionHandle) -> Result<()> {
    let snapshot = session.snapshot().await?;
    println!(
        "{}",
        view::format_transcript(&snapshot.transcript, &snapshot.username)
    );
    Ok(())
}

async fn print_notices(mut events: broadcast::Receiver<SessionEvent>) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::Notice(notice)) => println!("! {notice}"),
            Ok(SessionEvent::HistoryExported(path)) => {
                println!("history saved to {}", path.display())
            }
            Ok(SessionEvent::TranscriptUpdated(_) | SessionEvent::DraftCleared) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notice printer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
