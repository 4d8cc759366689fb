//! One engine session: owned state, command handling, and the spawned
//! traversal task.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use placefeed_core::{export_records, EngineConfig, ExportFormat};

use crate::ctx::EngineCtx;
use crate::dom::Document;
use crate::error::EngineError;
use crate::protocol::{Command, Event, Response, StatusSink};
use crate::selectors::SelectorStrategy;
use crate::state::{RunState, StopFlag};
use crate::store::RecordStore;
use crate::traverse;

/// An engine instance with injected dependencies, constructed once per
/// traversal session.
///
/// Commands are handled on the caller's task; a `start` spawns the
/// traversal as its own cooperative task which shares the context. All
/// outcomes cross the protocol boundary as [`Response`] values — a
/// command can never panic the caller or return a raw error.
pub struct Session {
    ctx: Arc<EngineCtx>,
    state: Arc<Mutex<RunState>>,
    run_task: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    #[must_use]
    pub fn new(
        doc: Arc<dyn Document>,
        sel: SelectorStrategy,
        cfg: EngineConfig,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            ctx: Arc::new(EngineCtx {
                doc,
                sel,
                cfg,
                store: Arc::new(Mutex::new(RecordStore::new())),
                sink,
                stop: StopFlag::new(),
            }),
            state: Arc::new(Mutex::new(RunState::Idle)),
            run_task: Mutex::new(None),
        }
    }

    /// Handles one command and produces its paired response.
    pub async fn handle(&self, command: Command) -> Response {
        match command {
            Command::Start => self.start().await,
            Command::Stop => self.stop().await,
            Command::Reset => self.reset().await,
            Command::GetStatus => self.status().await,
            Command::Export { format } => self.export(format).await,
        }
    }

    /// Waits for a spawned traversal task to finish, if one exists.
    /// Intended for orderly shutdown after a `stop`.
    pub async fn wait_for_run_end(&self) {
        let task = self.run_task.lock().await.take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }

    async fn start(&self) -> Response {
        let mut state = self.state.lock().await;
        if state.is_running() {
            return Response::AlreadyRunning;
        }

        // A run cannot begin without the feed container on the page.
        if self.ctx.doc.select_first(&self.ctx.sel.feed_container).is_none() {
            let message = "no result feed found on this page".to_owned();
            tracing::warn!("{message}");
            self.ctx.sink.emit(Event::ScrapingError {
                message: message.clone(),
            });
            return Response::Error { message };
        }

        self.ctx.stop.clear();
        *state = RunState::Running;
        drop(state);

        let ctx = Arc::clone(&self.ctx);
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            let cause = traverse::run(ctx.as_ref()).await;
            *state.lock().await = RunState::Stopped(cause);
        });
        *self.run_task.lock().await = Some(task);

        Response::Started
    }

    async fn stop(&self) -> Response {
        if self.state.lock().await.is_running() {
            self.ctx.stop.set();
        }
        let count = self.ctx.store.lock().await.len();
        Response::Stopped { count }
    }

    async fn reset(&self) -> Response {
        if self.state.lock().await.is_running() {
            return Response::Error {
                message: "cannot reset while a run is active".to_owned(),
            };
        }
        self.ctx.store.lock().await.clear();
        Response::Reset { count: 0 }
    }

    async fn status(&self) -> Response {
        let is_running = self.state.lock().await.is_running();
        let count = self.ctx.store.lock().await.len();
        Response::Status { is_running, count }
    }

    async fn export(&self, format: ExportFormat) -> Response {
        let store = self.ctx.store.lock().await;
        if store.is_empty() {
            return Response::NoData;
        }
        match export_records(store.records(), format).map_err(EngineError::from) {
            Ok(content) => Response::Exported { content },
            Err(err) => Response::Error {
                message: err.to_string(),
            },
        }
    }
}
