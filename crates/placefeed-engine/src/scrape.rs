//! One traversal step: select a feed entry, wait for the detail view,
//! extract, and commit.

use chrono::Utc;

use placefeed_core::{canonical_key, Record};

use crate::ctx::EngineCtx;
use crate::detect::{await_detail_ready, DetailWait};
use crate::dom::Document;
use crate::error::EngineError;
use crate::extract::{self, Patterns};
use crate::protocol::Event;
use crate::selectors::SelectorStrategy;

/// One selectable item in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub handle: String,
    /// The place-detail link, unmodified.
    pub href: String,
    /// Text of the entry's immediate container, for card-level
    /// fallbacks.
    pub card_text: String,
}

/// Snapshot of the currently visible feed entries, in document order.
/// Links without an href are not selectable and are dropped.
#[must_use]
pub fn visible_entries(doc: &dyn Document, sel: &SelectorStrategy) -> Vec<FeedEntry> {
    doc.select_all(&sel.entry_links)
        .into_iter()
        .filter_map(|element| {
            let href = element.href?;
            Some(FeedEntry {
                handle: element.handle,
                href,
                card_text: element.text,
            })
        })
        .collect()
}

/// How one scrape attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Committed,
    /// Canonical key already committed; no interaction performed.
    SkippedDuplicate,
    /// The detail view still shows the pre-click item, so the click did
    /// not register or re-selected the same entry.
    SkippedNoChange,
    /// No name could be extracted; the record gate rejects it.
    SkippedNoName,
}

/// Scrapes a single feed entry.
///
/// Emits one `updateCount` notification on commit and nothing otherwise.
/// A failed readiness wait is logged and extraction proceeds degraded.
///
/// # Errors
///
/// Returns [`EngineError::Document`] if the selection click fails; the
/// caller treats this as a per-entry failure, not a fatal one.
pub async fn scrape_entry(ctx: &EngineCtx, entry: &FeedEntry) -> Result<ScrapeOutcome, EngineError> {
    let key = canonical_key(&entry.href);
    if ctx.store.lock().await.contains_key(&key) {
        return Ok(ScrapeOutcome::SkippedDuplicate);
    }

    let pat = Patterns::new();
    let doc = ctx.doc.as_ref();
    let previous_name = extract::displayed_name(doc, &ctx.sel).unwrap_or_default();
    // Captured before the click: the detail view may lack a phone that
    // is visible on the card itself.
    let card_phone = extract::phone_from_text(&entry.card_text, &pat);

    ctx.doc.click(&entry.handle).await?;

    let wait = await_detail_ready(doc, &ctx.sel, &previous_name, &ctx.cfg, &ctx.stop).await;
    if wait == DetailWait::TimedOut {
        tracing::warn!(url = %entry.href, "detail view never became ready, extracting anyway");
    }

    // Absorb trailing mutations after the wait resolves.
    tokio::time::sleep(ctx.cfg.settle_delay).await;

    if !previous_name.is_empty()
        && extract::displayed_name(doc, &ctx.sel).as_deref() == Some(previous_name.as_str())
    {
        return Ok(ScrapeOutcome::SkippedNoChange);
    }

    let Some(name) = extract::extract_name(doc, &ctx.sel) else {
        return Ok(ScrapeOutcome::SkippedNoName);
    };

    let record = Record {
        name,
        phone: extract::extract_phone(doc, &ctx.sel, &pat).or(card_phone),
        website: extract::extract_website(doc, &ctx.sel, &pat),
        address: extract::extract_address(doc, &ctx.sel),
        rating: extract::extract_rating(doc, &ctx.sel, &pat),
        review_count: extract::extract_review_count(doc, &ctx.sel, &pat),
        category: extract::extract_category(doc, &ctx.sel, &pat),
        source_url: entry.href.clone(),
        captured_at: Utc::now(),
    };

    let count = {
        let mut store = ctx.store.lock().await;
        if !store.commit(record) {
            return Ok(ScrapeOutcome::SkippedDuplicate);
        }
        store.len()
    };
    ctx.sink.emit(Event::UpdateCount { count });

    Ok(ScrapeOutcome::Committed)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::fake::{el, labeled, test_ctx, FakeDocument, Mutation, RecordingSink};
    use crate::selectors::SelectorStrategy;

    fn entry(handle: &str, card_text: &str) -> FeedEntry {
        FeedEntry {
            handle: handle.to_owned(),
            href: format!("https://www.google.com/maps/place/{handle}?hl=en"),
            card_text: card_text.to_owned(),
        }
    }

    fn full_detail_pane(sel: &SelectorStrategy, name: &str) -> Vec<Mutation> {
        vec![
            Mutation::Set(sel.detail_headings[0].clone(), vec![el("h1", name)]),
            Mutation::Set(sel.item_actions.clone(), vec![el("save", "Save")]),
            Mutation::Set(
                sel.phone_action.clone(),
                vec![labeled("ph", "", "Phone: +1 503-555-0100")],
            ),
            Mutation::Set(
                sel.address_action.clone(),
                vec![labeled("ad", "", "Address: 456 Elm Ave, Portland, OR")],
            ),
            Mutation::Set(
                sel.rating_nodes.clone(),
                vec![labeled("rt", "", "4.5 stars 1,204 reviews")],
            ),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn commits_a_full_record() {
        let doc = Arc::new(FakeDocument::new());
        let sink = Arc::new(RecordingSink::default());
        let ctx = test_ctx(Arc::clone(&doc), sink.clone());
        doc.on_click("A", full_detail_pane(&ctx.sel, "Corner Cafe"));

        let outcome = scrape_entry(&ctx, &entry("A", "Corner Cafe")).await.unwrap();
        assert_eq!(outcome, ScrapeOutcome::Committed);

        let store = ctx.store.lock().await;
        assert_eq!(store.len(), 1);
        let rec = &store.records()[0];
        assert_eq!(rec.name, "Corner Cafe");
        assert_eq!(rec.phone.as_deref(), Some("+1 503-555-0100"));
        assert_eq!(rec.address.as_deref(), Some("456 Elm Ave, Portland, OR"));
        assert_eq!(rec.rating.as_deref(), Some("4.5"));
        assert_eq!(rec.review_count.as_deref(), Some("1204"));
        assert_eq!(rec.source_url, "https://www.google.com/maps/place/A?hl=en");
        drop(store);

        assert_eq!(sink.events(), vec![Event::UpdateCount { count: 1 }]);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_key_skips_without_interaction() {
        let doc = Arc::new(FakeDocument::new());
        let sink = Arc::new(RecordingSink::default());
        let ctx = test_ctx(Arc::clone(&doc), sink);
        doc.on_click("A", full_detail_pane(&ctx.sel, "Corner Cafe"));

        let first = entry("A", "");
        assert_eq!(
            scrape_entry(&ctx, &first).await.unwrap(),
            ScrapeOutcome::Committed
        );

        // Same place, different query component.
        let second = FeedEntry {
            handle: "A2".to_owned(),
            href: "https://www.google.com/maps/place/A?hl=fr".to_owned(),
            card_text: String::new(),
        };
        assert_eq!(
            scrape_entry(&ctx, &second).await.unwrap(),
            ScrapeOutcome::SkippedDuplicate
        );
        assert_eq!(ctx.store.lock().await.len(), 1);
        // only the first entry was ever clicked
        assert_eq!(doc.clicks(), vec!["A".to_owned()]);
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_title_after_click_is_skipped() {
        let doc = Arc::new(FakeDocument::new());
        let ctx = test_ctx(Arc::clone(&doc), Arc::new(RecordingSink::default()));
        // Detail view already shows Corner Cafe; the click changes nothing.
        doc.set(&ctx.sel.detail_headings[0], vec![el("h1", "Corner Cafe")]);
        doc.set(&ctx.sel.item_actions, vec![el("save", "Save")]);

        let outcome = scrape_entry(&ctx, &entry("A", "")).await.unwrap();
        assert_eq!(outcome, ScrapeOutcome::SkippedNoChange);
        assert!(ctx.store.lock().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_name_is_never_committed() {
        let doc = Arc::new(FakeDocument::new());
        let ctx = test_ctx(Arc::clone(&doc), Arc::new(RecordingSink::default()));
        // Click renders nothing extractable.
        let outcome = scrape_entry(&ctx, &entry("A", "")).await.unwrap();
        assert_eq!(outcome, ScrapeOutcome::SkippedNoName);
        assert!(ctx.store.lock().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn card_phone_fills_in_when_detail_lacks_one() {
        let doc = Arc::new(FakeDocument::new());
        let ctx = test_ctx(Arc::clone(&doc), Arc::new(RecordingSink::default()));
        doc.on_click(
            "A",
            vec![
                Mutation::Set(
                    ctx.sel.detail_headings[0].clone(),
                    vec![el("h1", "Corner Cafe")],
                ),
                Mutation::Set(ctx.sel.item_actions.clone(), vec![el("save", "Save")]),
            ],
        );

        let outcome = scrape_entry(&ctx, &entry("A", "Corner Cafe · +1 503-555-0100 · Open"))
            .await
            .unwrap();
        assert_eq!(outcome, ScrapeOutcome::Committed);
        let store = ctx.store.lock().await;
        assert_eq!(store.records()[0].phone.as_deref(), Some("+1 503-555-0100"));
    }

    #[tokio::test(start_paused = true)]
    async fn degraded_wait_still_commits_when_title_is_valid() {
        let doc = Arc::new(FakeDocument::new());
        let ctx = test_ctx(Arc::clone(&doc), Arc::new(RecordingSink::default()));
        // Title renders, but no anchoring signal ever appears: the wait
        // times out degraded and extraction proceeds regardless.
        doc.on_click(
            "A",
            vec![Mutation::Set(
                ctx.sel.detail_headings[0].clone(),
                vec![el("h1", "Corner Cafe")],
            )],
        );

        let outcome = scrape_entry(&ctx, &entry("A", "")).await.unwrap();
        assert_eq!(outcome, ScrapeOutcome::Committed);
        let store = ctx.store.lock().await;
        assert_eq!(store.records()[0].name, "Corner Cafe");
    }
}
