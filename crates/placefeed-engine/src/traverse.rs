//! The traversal loop over the virtualized feed.
//!
//! One cooperative task per run: snapshot the visible entries, scrape
//! from the cursor forward, scroll to reveal more, and account for
//! stalls. The cursor advances before each scrape attempt so a failure
//! can never replay an entry, and it resets only when the virtualized
//! window shrinks underneath it.

use uuid::Uuid;

use crate::ctx::EngineCtx;
use crate::dom::Document;
use crate::error::EngineError;
use crate::protocol::Event;
use crate::scrape::{scrape_entry, visible_entries, ScrapeOutcome};
use crate::state::StopCause;

/// Drives the feed until exhaustion, stall, stop request, or fatal
/// error, and reports completion with the final count.
///
/// Never returns an error: per-entry failures are logged and skipped,
/// and anything that escapes the cycle becomes [`StopCause::Fatal`]
/// plus a `scrapingError` notification.
pub async fn run(ctx: &EngineCtx) -> StopCause {
    let run_id = Uuid::new_v4();
    tracing::info!(%run_id, "traversal starting");

    let cause = match run_cycles(ctx).await {
        Ok(cause) => cause,
        Err(err) => {
            tracing::error!(%run_id, error = %err, "traversal aborted");
            ctx.sink.emit(Event::ScrapingError {
                message: err.to_string(),
            });
            StopCause::Fatal
        }
    };

    let count = ctx.store.lock().await.len();
    tracing::info!(%run_id, ?cause, count, "traversal finished");
    ctx.sink.emit(Event::ScrapingComplete { count });
    cause
}

async fn run_cycles(ctx: &EngineCtx) -> Result<StopCause, EngineError> {
    let mut cursor = 0usize;
    let mut scroll_failures = 0u32;

    loop {
        if ctx.stop.is_set() {
            return Ok(StopCause::UserStop);
        }

        let entries = visible_entries(ctx.doc.as_ref(), &ctx.sel);
        if entries.len() < cursor {
            // The virtualized window re-indexed under us.
            tracing::debug!(visible = entries.len(), cursor, "visible window shrank, cursor reset");
            cursor = 0;
        }
        ctx.sink.emit(Event::UpdateProgress {
            message: format!("{} entries visible", entries.len()),
        });

        let mut committed_this_cycle = false;
        while cursor < entries.len() {
            if ctx.stop.is_set() {
                return Ok(StopCause::UserStop);
            }
            let entry = &entries[cursor];
            // Advance first so a failure cannot replay this entry.
            cursor += 1;

            match scrape_entry(ctx, entry).await {
                Ok(ScrapeOutcome::Committed) => {
                    committed_this_cycle = true;
                    tokio::time::sleep(ctx.cfg.entry_delay).await;
                }
                Ok(ScrapeOutcome::SkippedDuplicate) => {
                    tracing::debug!(url = %entry.href, "duplicate entry skipped");
                }
                Ok(outcome) => {
                    tracing::debug!(url = %entry.href, ?outcome, "entry skipped");
                    tokio::time::sleep(ctx.cfg.entry_delay).await;
                }
                Err(err) => {
                    tracing::warn!(url = %entry.href, error = %err, "entry scrape failed, continuing");
                    tokio::time::sleep(ctx.cfg.entry_delay).await;
                }
            }
        }

        // A stop requested during the last card must not trigger one
        // more scroll interaction.
        if ctx.stop.is_set() {
            return Ok(StopCause::UserStop);
        }

        if ctx.doc.body_contains(&ctx.sel.end_of_feed_marker) {
            return Ok(StopCause::Exhausted);
        }

        let before = entries.len();
        ctx.doc
            .scroll_to_bottom(&ctx.sel.feed_container)
            .await?;
        tokio::time::sleep(ctx.cfg.scroll_settle).await;
        let after = visible_entries(ctx.doc.as_ref(), &ctx.sel).len();

        if after <= before && !committed_this_cycle {
            scroll_failures += 1;
            tracing::debug!(
                scroll_failures,
                max = ctx.cfg.max_scroll_failures,
                "scroll produced no progress"
            );
            if scroll_failures >= ctx.cfg.max_scroll_failures {
                return Ok(StopCause::Stalled);
            }
        } else {
            scroll_failures = 0;
        }
    }
}
