//! Message session: the ordered message list plus per-request enrichment state

pub mod manager;
pub mod request;

pub use manager::Session;
pub use request::{RequestHandle, RequestId, RequestKey, RequestKind, RequestStatus};
