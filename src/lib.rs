/// lingo - a chat-style message session with on-demand summaries and translations.
///
/// Users submit messages; each message can then be summarized by a
/// summarization capability or translated into one of six languages by a
/// remote translation endpoint. Results are merged back into the message.
///
/// # Architecture
///
/// - [`session::Session`] owns the ordered messages and runs every enrichment
///   request as its own tokio task, tracking per-request status
/// - [`ai`] provides the summarization capability (`OpenAI` Responses API, or
///   [`ai::Unavailable`] when no key is configured)
/// - [`translate`] provides the HTTP translation client
/// - [`views`] and [`command_parser`] back the terminal front end
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use lingo::ai::Unavailable;
/// use lingo::core::config::AppConfig;
/// use lingo::core::language::Language;
/// use lingo::session::Session;
/// use lingo::translate::HttpTranslator;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     lingo::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let translator = HttpTranslator::from_config(&config)?;
///     let session = Session::new(Arc::new(Unavailable), Arc::new(translator));
///
///     if let Some(id) = session.submit("Hello world") {
///         session.translate(id, Language::Spanish).await?;
///         println!("{:?}", session.message(id));
///     }
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod command_parser;
pub mod core;
pub mod errors;
pub mod session;
pub mod translate;
pub mod views;

pub use ai::estimate_tokens;
pub use errors::{ServiceError, SessionError};
pub use session::Session;

/// Configure structured JSON logging on stderr.
///
/// Honors `RUST_LOG` (default `info`). Stdout is left to the terminal UI.
/// Calling it more than once is harmless; later calls are ignored.
///
/// # Example
///
/// ```
/// lingo::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
