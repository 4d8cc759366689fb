//! Domain types, configuration, and export transforms for placefeed.
//!
//! Everything in this crate is synchronous and side-effect-free apart from
//! the optional env-var lookup in [`config`]; the async engine lives in
//! `placefeed-engine`.

pub mod config;
pub mod export;
pub mod record;

pub use config::{ConfigError, EngineConfig};
pub use export::{export_records, ExportFormat};
pub use record::{canonical_key, Record};
