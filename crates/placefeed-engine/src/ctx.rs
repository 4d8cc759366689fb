//! Shared context for one engine session.

use std::sync::Arc;

use tokio::sync::Mutex;

use placefeed_core::EngineConfig;

use crate::dom::Document;
use crate::protocol::StatusSink;
use crate::selectors::SelectorStrategy;
use crate::state::StopFlag;
use crate::store::RecordStore;

/// Injected dependencies and owned state of a traversal session.
///
/// Constructed once per session; the traversal task and the command
/// handler share it through an `Arc`. The store mutex is never held
/// across an await point, so lock contention is bounded by a single
/// commit or read.
pub struct EngineCtx {
    pub doc: Arc<dyn Document>,
    pub sel: SelectorStrategy,
    pub cfg: EngineConfig,
    pub store: Arc<Mutex<RecordStore>>,
    pub sink: Arc<dyn StatusSink>,
    pub stop: StopFlag,
}
