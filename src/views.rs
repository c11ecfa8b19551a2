//! Plain-text rendering of a message session for the terminal front end.

use std::fmt::Write as _;

use crate::core::language::Language;
use crate::core::models::{Message, MessageId};
use crate::errors::SessionError;
use crate::session::{RequestKey, RequestKind, Session};

pub const WELCOME_BANNER: &str = "\
Welcome to lingo!
Send a message, then translate it with /translate <n> <code>.
Available languages: en pt es ru tr fr. Type /help for all commands.";

/// Point-in-time copy of everything the views need.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub messages: Vec<Message>,
    pub last_error: Option<SessionError>,
    pub show_welcome: bool,
    pub pending: Vec<RequestKey>,
}

impl SessionView {
    #[must_use]
    pub fn capture(session: &Session) -> Self {
        Self {
            messages: session.messages(),
            last_error: session.last_error(),
            show_welcome: session.show_welcome(),
            pending: session.pending(),
        }
    }

    #[must_use]
    pub fn busy(&self) -> bool {
        !self.pending.is_empty()
    }

    fn pending_for(&self, id: MessageId) -> Vec<RequestKind> {
        let mut kinds: Vec<RequestKind> = self
            .pending
            .iter()
            .filter(|k| k.message_id == id)
            .map(|k| k.kind)
            .collect();
        kinds.sort_by_key(|k| match k {
            RequestKind::Summarize => None,
            RequestKind::Translate(lang) => Some(*lang),
        });
        kinds
    }
}

#[must_use]
pub fn render_error_banner(error: &SessionError) -> String {
    format!("!! {error}")
}

/// Render one message. `index` is the 1-based display position.
#[must_use]
pub fn render_message(index: usize, message: &Message, pending: &[RequestKind]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{index}] {} {}",
        message.created_at.format("%H:%M:%S"),
        message.text
    );

    if let Some(summary) = &message.summary {
        let _ = writeln!(out, "    summary: {summary}");
    }

    // BTreeMap keyed by Language iterates in display order.
    for (lang, text) in &message.translations {
        let _ = writeln!(out, "    {}: {text}", lang.code());
    }

    for kind in pending {
        let _ = writeln!(out, "    … {kind} in progress");
    }

    let mut actions: Vec<String> = Vec::new();
    if message.can_summarize() {
        actions.push("summarize".to_string());
    }
    let source = message.source_language();
    let remaining: Vec<&str> = Language::ALL
        .into_iter()
        .filter(|lang| *lang != source && !message.translations.contains_key(lang))
        .map(Language::code)
        .collect();
    if !remaining.is_empty() {
        actions.push(format!("translate: {}", remaining.join(" ")));
    }
    if !actions.is_empty() {
        let _ = writeln!(out, "    ({})", actions.join(" | "));
    }

    out
}

/// Render the whole session: banners first, then messages oldest to newest so
/// the latest message is always at the bottom.
#[must_use]
pub fn render_session(view: &SessionView) -> String {
    let mut out = String::new();

    if view.show_welcome {
        let _ = writeln!(out, "{WELCOME_BANNER}");
    }
    if let Some(err) = &view.last_error {
        let _ = writeln!(out, "{}", render_error_banner(err));
    }
    if view.busy() {
        let _ = writeln!(out, "… working ({} pending)", view.pending.len());
    }

    for (i, message) in view.messages.iter().enumerate() {
        out.push_str(&render_message(i + 1, message, &view.pending_for(message.id)));
    }

    out
}
