#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use lingo::ai::Summarizer;
use lingo::core::language::Language;
use lingo::errors::ServiceError;
use lingo::translate::Translator;

/// How a stubbed collaborator answers one call.
pub enum Reply {
    Now(Result<String, ServiceError>),
    /// Answer once the test sends a value through the paired sender.
    Gated(oneshot::Receiver<Result<String, ServiceError>>),
    /// Never answer.
    Hang,
    /// Panic inside the collaborator call.
    Panic,
}

impl Reply {
    pub fn ok(text: &str) -> Self {
        Reply::Now(Ok(text.to_string()))
    }

    pub fn err(error: ServiceError) -> Self {
        Reply::Now(Err(error))
    }

    pub fn gated() -> (Self, oneshot::Sender<Result<String, ServiceError>>) {
        let (tx, rx) = oneshot::channel();
        (Reply::Gated(rx), tx)
    }

    async fn resolve(self) -> Result<String, ServiceError> {
        match self {
            Reply::Now(result) => result,
            Reply::Gated(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ServiceError::Http("gate dropped".to_string()))),
            Reply::Hang => std::future::pending().await,
            Reply::Panic => panic!("stub collaborator blew up"),
        }
    }
}

/// Replies are consumed in call order; an empty queue answers `Unavailable`.
#[derive(Default)]
pub struct Script {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
}

impl Script {
    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next(&self) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Err(ServiceError::Unavailable),
        }
    }
}

#[derive(Default)]
pub struct StubSummarizer {
    pub script: Script,
    pub inputs: Mutex<Vec<String>>,
}

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, ServiceError> {
        self.inputs.lock().unwrap().push(text.to_string());
        self.script.next().await
    }
}

#[derive(Default)]
pub struct StubTranslator {
    pub script: Script,
    pub inputs: Mutex<Vec<(Language, Language, String)>>,
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(
        &self,
        source: Language,
        target: Language,
        text: &str,
    ) -> Result<String, ServiceError> {
        self.inputs
            .lock()
            .unwrap()
            .push((source, target, text.to_string()));
        self.script.next().await
    }
}

/// Wait until the script has been called at least `n` times.
pub async fn wait_for_calls(script: &Script, n: usize) {
    while script.calls() < n {
        tokio::task::yield_now().await;
    }
}

/// Yield until the session has no pending requests, giving up after a while.
pub async fn wait_until_idle(session: &lingo::session::Session) {
    for _ in 0..1_000 {
        if !session.busy() {
            return;
        }
        tokio::task::yield_now().await;
    }
}

/// `reqwest` client that ignores proxy settings from the environment.
pub fn direct_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Serve exactly one canned HTTP response on a random local port.
///
/// Returns the base URL and a handle resolving to the raw request received.
pub async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });

    (format!("http://{addr}"), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}
