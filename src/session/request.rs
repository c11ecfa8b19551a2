use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use uuid::Uuid;

use super::manager::SessionState;
use crate::core::language::Language;
use crate::core::models::MessageId;
use crate::errors::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub Uuid);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Summarize,
    Translate(Language),
}

impl RequestKind {
    /// The user-visible error reported when a request of this kind fails.
    #[must_use]
    pub fn failure(self) -> SessionError {
        match self {
            RequestKind::Summarize => SessionError::SummarizationFailed,
            RequestKind::Translate(_) => SessionError::TranslationFailed,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Summarize => f.write_str("summarize"),
            RequestKind::Translate(lang) => write!(f, "translate:{lang}"),
        }
    }
}

/// At most one request per key is in flight; a newer one supersedes the older.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub message_id: MessageId,
    pub kind: RequestKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Succeeded,
    Failed(SessionError),
    /// A newer request for the same key replaced this one before it settled.
    Superseded,
    Cancelled,
}

impl RequestStatus {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }
}

/// Handle to a spawned enrichment request.
pub struct RequestHandle {
    pub(super) id: RequestId,
    pub(super) key: RequestKey,
    pub(super) join: JoinHandle<RequestStatus>,
    pub(super) state: Arc<Mutex<SessionState>>,
}

impl RequestHandle {
    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    #[must_use]
    pub fn key(&self) -> RequestKey {
        self.key
    }

    /// Wait for the request to settle and return its final status.
    pub async fn wait(self) -> RequestStatus {
        match self.join.await {
            Ok(status) => status,
            Err(join_err) => {
                // Aborted tasks were already marked superseded or cancelled; a
                // panicked task is still pending and gets settled as a failure.
                let mut state = super::manager::lock(&self.state);
                state.settle_lost(self.id, self.key, &join_err.to_string())
            }
        }
    }
}

impl fmt::Debug for RequestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandle")
            .field("id", &self.id)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
