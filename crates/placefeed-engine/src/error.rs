use thiserror::Error;

use crate::dom::DocumentError;

/// Errors that can terminate engine operations.
///
/// Per-entry failures never surface as this type to callers of the run
/// loop — they are caught and logged inside the traversal cycle. An
/// `EngineError` escaping the cycle is by definition fatal to the run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("document driver error: {0}")]
    Document(#[from] DocumentError),

    #[error("export serialization error: {0}")]
    Export(#[from] serde_json::Error),
}
