//! Extraction/traversal engine for a virtualized result feed.
//!
//! The engine drives a continuously mutating, windowed list of place
//! entries through an injected [`dom::Document`] driver: select an entry,
//! wait for the asynchronously rendered detail view to settle, run the
//! field extractors, commit a deduplicated record, advance. It owns the
//! run/stop lifecycle, the stall/retry policy, and the command/response
//! control plane; rendering the operator UI and interpreting selector
//! strings against the host page are the driver's problem.

pub mod ctx;
pub mod detect;
pub mod dom;
pub mod error;
pub mod extract;
pub mod protocol;
pub mod scrape;
pub mod selectors;
pub mod session;
pub mod state;
pub mod store;
pub mod traverse;

#[cfg(test)]
pub(crate) mod fake;

pub use ctx::EngineCtx;
pub use detect::{await_detail_ready, DetailWait};
pub use dom::{Document, DocumentError, Element};
pub use error::EngineError;
pub use protocol::{Command, Event, NullSink, Response, StatusSink};
pub use scrape::{scrape_entry, visible_entries, FeedEntry, ScrapeOutcome};
pub use selectors::SelectorStrategy;
pub use session::Session;
pub use state::{RunState, StopCause, StopFlag};
pub use store::RecordStore;
