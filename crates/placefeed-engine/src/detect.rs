//! Detail-ready detection.
//!
//! The detail view is rendered asynchronously into a reused DOM subtree,
//! so there is no load event to wait for; readiness has to be inferred
//! from content change. The detector polls until the view shows a title
//! that differs from the previously selected item and is anchored by at
//! least one item-bound control, then resolves early.

use tokio::time::{sleep, Instant};

use placefeed_core::EngineConfig;

use crate::dom::Document;
use crate::extract::displayed_name;
use crate::selectors::SelectorStrategy;
use crate::state::StopFlag;

/// Outcome of one bounded readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailWait {
    /// The view updated to the newly selected item within the bound.
    Ready,
    /// The bound elapsed, but a valid title is showing; extraction can
    /// proceed with whatever is rendered.
    Degraded,
    /// The bound elapsed with no valid title at all.
    TimedOut,
}

/// Polls until the detail view reflects a new selection, up to the
/// configured timeout.
///
/// `previous_name` is the title displayed before the selection (empty
/// for the first one). Readiness requires a non-placeholder title
/// distinct from it, plus one of the anchoring signals: an item-bound
/// action control, a tab strip, or a category marker. A pending stop
/// request short-circuits the wait and resolves by the timeout rule.
pub async fn await_detail_ready(
    doc: &dyn Document,
    sel: &SelectorStrategy,
    previous_name: &str,
    cfg: &EngineConfig,
    stop: &StopFlag,
) -> DetailWait {
    let deadline = Instant::now() + cfg.detail_timeout;

    loop {
        if let Some(title) = displayed_name(doc, sel) {
            if title != previous_name && is_anchored(doc, sel) {
                return DetailWait::Ready;
            }
        }
        if stop.is_set() || Instant::now() >= deadline {
            break;
        }
        sleep(cfg.poll_interval).await;
    }

    if displayed_name(doc, sel).is_some() {
        DetailWait::Degraded
    } else {
        DetailWait::TimedOut
    }
}

/// Whether the detail view shows content bound to a concrete item, as
/// opposed to the skeleton it renders while loading.
fn is_anchored(doc: &dyn Document, sel: &SelectorStrategy) -> bool {
    !doc.select_all(&sel.item_actions).is_empty()
        || !doc.select_all(&sel.tab_strip).is_empty()
        || !doc.select_all(&sel.category_action).is_empty()
}
