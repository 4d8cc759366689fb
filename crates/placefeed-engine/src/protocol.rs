//! Control-plane messages: commands with paired responses, and
//! fire-and-forget push notifications.
//!
//! Both directions are serde-serializable so any transport that can move
//! JSON (an extension message bus, a websocket, a channel) can carry
//! them. Nothing in the engine ever panics or errors across this
//! boundary — every outcome becomes a [`Response`] or an [`Event`].

use serde::{Deserialize, Serialize};

use placefeed_core::ExportFormat;

/// Operator commands. Each produces exactly one [`Response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    Start,
    Stop,
    Reset,
    GetStatus,
    Export { format: ExportFormat },
}

/// The paired response to a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Started,
    AlreadyRunning,
    Stopped { count: usize },
    Reset { count: usize },
    Status {
        #[serde(rename = "isRunning")]
        is_running: bool,
        count: usize,
    },
    Exported { content: String },
    NoData,
    Error { message: String },
}

/// Push notifications from the engine to the observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    UpdateCount { count: usize },
    UpdateProgress { message: String },
    ScrapingComplete { count: usize },
    ScrapingError { message: String },
}

/// Abstract sink for push notifications. Fire-and-forget: a sink must
/// never block the engine or propagate failure back into it.
pub trait StatusSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Sink that discards every event.
pub struct NullSink;

impl StatusSink for NullSink {
    fn emit(&self, _event: Event) {}
}

/// A tokio unbounded sender is a natural sink; a closed receiver just
/// means nobody is listening anymore.
impl StatusSink for tokio::sync::mpsc::UnboundedSender<Event> {
    fn emit(&self, event: Event) {
        let _ = self.send(event);
    }
}
