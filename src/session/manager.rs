use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use tokio::task::AbortHandle;
use tracing::{error, info, warn};

use super::request::{RequestHandle, RequestId, RequestKey, RequestKind, RequestStatus};
use crate::ai::Summarizer;
use crate::core::language::Language;
use crate::core::models::{Message, MessageId};
use crate::errors::{ServiceError, SessionError};
use crate::translate::Translator;

struct InFlight {
    request_id: RequestId,
    abort: AbortHandle,
}

pub(crate) struct SessionState {
    messages: Vec<Message>,
    next_id: u64,
    // Statuses are kept for the lifetime of the session, like the messages.
    requests: HashMap<RequestId, (RequestKey, RequestStatus)>,
    // Invariant: a key is present here iff its request's status is `Pending`.
    in_flight: HashMap<RequestKey, InFlight>,
    last_error: Option<SessionError>,
    show_welcome: bool,
}

pub(crate) fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionState {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            requests: HashMap::new(),
            in_flight: HashMap::new(),
            last_error: None,
            show_welcome: true,
        }
    }

    fn message(&self, id: MessageId) -> Option<&Message> {
        // Ids are handed out in increasing order and messages are never removed.
        self.messages
            .binary_search_by_key(&id, |m| m.id)
            .ok()
            .map(|idx| &self.messages[idx])
    }

    fn message_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages
            .binary_search_by_key(&id, |m| m.id)
            .ok()
            .map(|idx| &mut self.messages[idx])
    }

    fn set_status(&mut self, request_id: RequestId, status: RequestStatus) {
        if let Some(entry) = self.requests.get_mut(&request_id) {
            entry.1 = status;
        }
    }

    fn status(&self, request_id: RequestId) -> Option<RequestStatus> {
        self.requests.get(&request_id).map(|(_, s)| s.clone())
    }

    /// Abort whatever is in flight for `key` and mark it with `status`.
    fn interrupt(&mut self, key: RequestKey, status: RequestStatus) -> Option<RequestId> {
        let prev = self.in_flight.remove(&key)?;
        prev.abort.abort();
        self.set_status(prev.request_id, status);
        Some(prev.request_id)
    }

    fn release(&mut self, request_id: RequestId, key: RequestKey) {
        if self
            .in_flight
            .get(&key)
            .is_some_and(|f| f.request_id == request_id)
        {
            self.in_flight.remove(&key);
        }
    }

    /// Apply the result of a finished request, unless it was superseded or
    /// cancelled in the meantime.
    fn settle(
        &mut self,
        request_id: RequestId,
        key: RequestKey,
        result: Result<String, ServiceError>,
    ) -> RequestStatus {
        match self.status(request_id) {
            Some(RequestStatus::Pending) => {}
            Some(stale) => {
                info!(
                    "Discarding result of {} request {} for message {}: {:?}",
                    key.kind, request_id, key.message_id, stale
                );
                return stale;
            }
            None => return RequestStatus::Cancelled,
        }

        self.release(request_id, key);

        let status = match result {
            Ok(value) => {
                if let Some(message) = self.message_mut(key.message_id) {
                    match key.kind {
                        RequestKind::Summarize => message.summary = Some(value),
                        RequestKind::Translate(lang) => {
                            message.translations.insert(lang, value);
                        }
                    }
                } else {
                    warn!("Message {} vanished before {} settled", key.message_id, key.kind);
                }
                RequestStatus::Succeeded
            }
            Err(err) => {
                error!(
                    "{} request {} for message {} failed: {}",
                    key.kind, request_id, key.message_id, err
                );
                let failure = key.kind.failure();
                self.last_error = Some(failure.clone());
                RequestStatus::Failed(failure)
            }
        };

        self.set_status(request_id, status.clone());
        status
    }

    /// Settle a request whose task ended without reporting back.
    pub(crate) fn settle_lost(
        &mut self,
        request_id: RequestId,
        key: RequestKey,
        detail: &str,
    ) -> RequestStatus {
        match self.status(request_id) {
            Some(RequestStatus::Pending) => {
                self.release(request_id, key);
                error!(
                    "{} request {} for message {} was lost: {}",
                    key.kind, request_id, key.message_id, detail
                );
                let failure = key.kind.failure();
                self.last_error = Some(failure.clone());
                let status = RequestStatus::Failed(failure);
                self.set_status(request_id, status.clone());
                status
            }
            Some(status) => status,
            None => RequestStatus::Cancelled,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Owns the ordered list of submitted messages and runs summarize/translate
/// requests against the external services, merging results back in.
///
/// Cloning is cheap and every clone shares the same session.
#[derive(Clone)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
    summarizer: Arc<dyn Summarizer>,
    translator: Arc<dyn Translator>,
}

impl Session {
    #[must_use]
    pub fn new(summarizer: Arc<dyn Summarizer>, translator: Arc<dyn Translator>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new())),
            summarizer,
            translator,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        lock(&self.state)
    }

    /// Append a new message. Whitespace-only input is ignored.
    ///
    /// The stored text is exactly what was passed in; trimming only decides
    /// whether there is anything to submit.
    pub fn submit(&self, text: &str) -> Option<MessageId> {
        if text.trim().is_empty() {
            return None;
        }

        let mut state = self.lock();
        let id = MessageId(state.next_id);
        state.next_id += 1;
        state.messages.push(Message::new(id, text.to_string()));
        state.last_error = None;
        state.show_welcome = false;
        info!("Submitted message {} ({} chars)", id, text.chars().count());
        Some(id)
    }

    /// Register a request for `key` and spawn its work on the tokio runtime.
    ///
    /// The whole registration happens under one lock, so a superseded task can
    /// never observe itself as pending once a newer request exists.
    fn start<F, Fut>(&self, key: RequestKey, make_work: F) -> Result<RequestHandle, SessionError>
    where
        F: FnOnce(&Message) -> Fut,
        Fut: Future<Output = Result<String, ServiceError>> + Send + 'static,
    {
        let mut state = self.lock();
        let message = state
            .message(key.message_id)
            .ok_or(SessionError::MessageNotFound(key.message_id))?;
        let work = make_work(message);

        if let Some(prev) = state.interrupt(key, RequestStatus::Superseded) {
            info!(
                "{} request {} for message {} superseded",
                key.kind, prev, key.message_id
            );
        }

        let request_id = RequestId::new();
        state.requests.insert(request_id, (key, RequestStatus::Pending));
        state.last_error = None;

        let task_state = Arc::clone(&self.state);
        let join = tokio::spawn(async move {
            // A panicking collaborator still settles the request, whether or
            // not anyone awaits the handle.
            let result = match AssertUnwindSafe(work).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => Err(ServiceError::Panicked(panic_message(payload.as_ref()))),
            };
            lock(&task_state).settle(request_id, key, result)
        });
        state.in_flight.insert(
            key,
            InFlight {
                request_id,
                abort: join.abort_handle(),
            },
        );

        info!(
            "Started {} request {} for message {}",
            key.kind, request_id, key.message_id
        );

        Ok(RequestHandle {
            id: request_id,
            key,
            join,
            state: Arc::clone(&self.state),
        })
    }

    /// Start summarizing a message in the background.
    ///
    /// Eligibility ([`Message::can_summarize`]) is not checked here.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MessageNotFound`] if no message has this id.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn_summarize(&self, id: MessageId) -> Result<RequestHandle, SessionError> {
        let summarizer = Arc::clone(&self.summarizer);
        let key = RequestKey {
            message_id: id,
            kind: RequestKind::Summarize,
        };
        self.start(key, |message| {
            let text = message.text.clone();
            async move { summarizer.summarize(&text).await }
        })
    }

    /// Summarize a message and wait for the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MessageNotFound`] if no message has this id.
    /// Service failures are reported through the returned status and
    /// [`Session::last_error`].
    pub async fn summarize(&self, id: MessageId) -> Result<RequestStatus, SessionError> {
        Ok(self.spawn_summarize(id)?.wait().await)
    }

    /// Start translating a message into `target` in the background.
    ///
    /// The source language is the message's detected language, falling back
    /// to English when none was detected.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MessageNotFound`] if no message has this id.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn_translate(
        &self,
        id: MessageId,
        target: Language,
    ) -> Result<RequestHandle, SessionError> {
        let translator = Arc::clone(&self.translator);
        let key = RequestKey {
            message_id: id,
            kind: RequestKind::Translate(target),
        };
        self.start(key, |message| {
            let text = message.text.clone();
            let source = message.source_language();
            async move { translator.translate(source, target, &text).await }
        })
    }

    /// # Errors
    ///
    /// Returns [`SessionError::MessageNotFound`] if no message has this id.
    pub async fn translate(
        &self,
        id: MessageId,
        target: Language,
    ) -> Result<RequestStatus, SessionError> {
        Ok(self.spawn_translate(id, target)?.wait().await)
    }

    /// Abort the in-flight request for this message and kind, if any.
    pub fn cancel(&self, id: MessageId, kind: RequestKind) -> bool {
        let key = RequestKey {
            message_id: id,
            kind,
        };
        let cancelled = self.lock().interrupt(key, RequestStatus::Cancelled);
        if let Some(request_id) = cancelled {
            info!("{} request {} for message {} cancelled", kind, request_id, id);
        }
        cancelled.is_some()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    #[must_use]
    pub fn message(&self, id: MessageId) -> Option<Message> {
        self.lock().message(id).cloned()
    }

    /// True while any request is pending.
    #[must_use]
    pub fn busy(&self) -> bool {
        !self.lock().in_flight.is_empty()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<SessionError> {
        self.lock().last_error.clone()
    }

    #[must_use]
    pub fn show_welcome(&self) -> bool {
        self.lock().show_welcome
    }

    /// Status of any request started in this session. Settled statuses are
    /// never pruned.
    #[must_use]
    pub fn status(&self, request_id: RequestId) -> Option<RequestStatus> {
        self.lock().status(request_id)
    }

    /// Keys of every request still in flight.
    #[must_use]
    pub fn pending(&self) -> Vec<RequestKey> {
        self.lock().in_flight.keys().copied().collect()
    }
}
