use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use lingo::ai::{LlmClient, Summarizer, Unavailable};
use lingo::command_parser::{Command, HELP_TEXT, parse_command};
use lingo::core::config::AppConfig;
use lingo::core::language::Language;
use lingo::core::models::MessageId;
use lingo::errors::SessionError;
use lingo::session::{RequestHandle, RequestStatus, Session};
use lingo::translate::HttpTranslator;
use lingo::views::{SessionView, render_session};

#[tokio::main]
async fn main() -> Result<()> {
    lingo::setup_logging();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let summarizer: Arc<dyn Summarizer> = if let Some(client) = LlmClient::from_config(&config) {
        Arc::new(client)
    } else {
        info!("OPENAI_API_KEY not set, summarization is unavailable");
        Arc::new(Unavailable)
    };
    let translator =
        HttpTranslator::from_config(&config).context("failed to build translation client")?;
    let session = Session::new(summarizer, Arc::new(translator));

    redraw(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP_TEXT}"),
            Command::List => redraw(&session),
            Command::Submit(text) => {
                if session.submit(&text).is_some() {
                    redraw(&session);
                }
            }
            Command::Summarize(n) => {
                let Some(id) = resolve(&session, n) else { continue };
                let eligible = session.message(id).is_some_and(|m| m.can_summarize());
                if !eligible {
                    println!("Message {n} cannot be summarized");
                    continue;
                }
                settle_in_background(&session, session.spawn_summarize(id));
            }
            Command::Translate(n, lang) => {
                let Some(id) = resolve(&session, n) else { continue };
                settle_in_background(&session, session.spawn_translate(id, lang));
            }
            Command::TranslateAll(n) => {
                let Some(id) = resolve(&session, n) else { continue };
                tokio::spawn(translate_all(session.clone(), id));
            }
            Command::Cancel(n, kind) => {
                let Some(id) = resolve(&session, n) else { continue };
                if !session.cancel(id, kind) {
                    println!("Nothing to cancel for message {n}");
                }
            }
        }
    }

    Ok(())
}

fn redraw(session: &Session) {
    print!("{}", render_session(&SessionView::capture(session)));
}

fn resolve(session: &Session, n: usize) -> Option<MessageId> {
    let id = session.messages().get(n - 1).map(|m| m.id);
    if id.is_none() {
        println!("No message number {n}");
    }
    id
}

/// Let the request finish on its own task so input stays responsive, then
/// redraw with the result.
fn settle_in_background(session: &Session, started: Result<RequestHandle, SessionError>) {
    match started {
        Ok(handle) => {
            redraw(session);
            let session = session.clone();
            tokio::spawn(async move {
                let id = handle.id();
                let status = handle.wait().await;
                info!("Request {} settled: {:?}", id, status);
                // Superseded and cancelled requests leave nothing new to show.
                if matches!(status, RequestStatus::Succeeded | RequestStatus::Failed(_)) {
                    redraw(&session);
                }
            });
        }
        Err(e) => println!("{e}"),
    }
}

/// Translate into every language other than the assumed source, concurrently.
async fn translate_all(session: Session, id: MessageId) {
    let source = session
        .message(id)
        .map_or(Language::English, |m| m.source_language());

    let mut handles = Vec::new();
    for lang in Language::ALL.into_iter().filter(|l| *l != source) {
        match session.spawn_translate(id, lang) {
            Ok(handle) => handles.push(handle),
            Err(e) => warn!("Could not start translation to {}: {}", lang, e),
        }
    }

    let statuses = join_all(handles.into_iter().map(|h| h.wait())).await;
    let failed = statuses
        .iter()
        .filter(|s| matches!(s, RequestStatus::Failed(_)))
        .count();
    info!(
        "Translated message {} into {} languages, {} failed",
        id,
        statuses.len(),
        failed
    );
    redraw(&session);
}
