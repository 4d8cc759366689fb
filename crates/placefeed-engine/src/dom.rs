//! The document driver boundary.
//!
//! The engine never touches the host page directly; it queries and
//! interacts through an injected [`Document`] implementation. Selector
//! strings are opaque to the engine — the driver interprets them against
//! whatever rendering substrate it wraps, and the engine only reasons
//! about the [`Element`] snapshots it gets back.

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a [`Document`] driver.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The handle refers to an element the driver no longer tracks,
    /// typically because the virtualized list recycled it.
    #[error("element no longer attached: {handle}")]
    Detached { handle: String },

    #[error("document driver failure: {0}")]
    Driver(String),
}

/// A read-only snapshot of one rendered element.
///
/// `handle` is a driver-assigned opaque token valid for interaction until
/// the underlying element is recycled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub handle: String,
    /// Visible text content, trimmed by the driver.
    pub text: String,
    pub aria_label: Option<String>,
    pub href: Option<String>,
}

impl Element {
    /// The accessible label when present and non-blank, else the text.
    #[must_use]
    pub fn label_or_text(&self) -> &str {
        self.aria_label
            .as_deref()
            .filter(|label| !label.trim().is_empty())
            .unwrap_or(&self.text)
    }
}

/// Accessor for the host page's rendered document.
///
/// Reads are synchronous snapshots of the current render; interactions
/// are async because they trigger host-page work the engine must yield
/// to. Implementations must be safe to share across the spawned
/// traversal task.
#[async_trait]
pub trait Document: Send + Sync {
    /// All elements currently matching `selector`, in document order.
    fn select_all(&self, selector: &str) -> Vec<Element>;

    /// First element currently matching `selector`.
    fn select_first(&self, selector: &str) -> Option<Element> {
        self.select_all(selector).into_iter().next()
    }

    /// Whether the rendered document currently contains `needle` as
    /// visible text.
    fn body_contains(&self, needle: &str) -> bool;

    /// Dispatches a selection (click-equivalent) on the element behind
    /// `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Detached`] if the handle is stale, or
    /// [`DocumentError::Driver`] for substrate failures.
    async fn click(&self, handle: &str) -> Result<(), DocumentError>;

    /// Scrolls the container matching `selector` to its bottom,
    /// prompting the virtualized feed to render more entries.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Driver`] if the container cannot be
    /// scrolled.
    async fn scroll_to_bottom(&self, selector: &str) -> Result<(), DocumentError>;
}
