//! Scripted in-memory document driver for engine tests.
//!
//! Selections are keyed by the exact selector strings the strategy
//! carries; scripted mutations fire on click, on scroll, or after a
//! number of polls of a given selector, which is enough to simulate a
//! virtualized feed and an asynchronously rendered detail view.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use placefeed_core::EngineConfig;

use crate::ctx::EngineCtx;
use crate::dom::{Document, DocumentError, Element};
use crate::protocol::{Event, StatusSink};
use crate::selectors::SelectorStrategy;
use crate::state::StopFlag;
use crate::store::RecordStore;

pub(crate) fn el(handle: &str, text: &str) -> Element {
    Element {
        handle: handle.to_owned(),
        text: text.to_owned(),
        aria_label: None,
        href: None,
    }
}

pub(crate) fn labeled(handle: &str, text: &str, label: &str) -> Element {
    Element {
        handle: handle.to_owned(),
        text: text.to_owned(),
        aria_label: Some(label.to_owned()),
        href: None,
    }
}

pub(crate) fn link(handle: &str, text: &str, href: &str) -> Element {
    Element {
        handle: handle.to_owned(),
        text: text.to_owned(),
        aria_label: None,
        href: Some(href.to_owned()),
    }
}

/// A scripted change to the fake document.
pub(crate) enum Mutation {
    /// Replace the elements matching a selector.
    Set(String, Vec<Element>),
    /// Extend the elements matching a selector.
    Append(String, Vec<Element>),
    /// Add visible text (e.g. the end-of-feed marker).
    AddMarker(String),
}

#[derive(Default)]
struct Inner {
    selections: HashMap<String, Vec<Element>>,
    markers: Vec<String>,
    on_click: HashMap<String, Vec<Mutation>>,
    failing_clicks: HashSet<String>,
    scroll_batches: VecDeque<Vec<Mutation>>,
    delayed: Option<(String, u32, Vec<Mutation>)>,
    clicks: Vec<String>,
    scrolls: usize,
    fail_next_scroll: bool,
}

#[derive(Default)]
pub(crate) struct FakeDocument {
    inner: Mutex<Inner>,
}

impl FakeDocument {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&self, selector: &str, elements: Vec<Element>) {
        self.lock().selections.insert(selector.to_owned(), elements);
    }

    pub(crate) fn add_marker(&self, text: &str) {
        self.lock().markers.push(text.to_owned());
    }

    /// Script mutations applied (once) when `handle` is clicked.
    pub(crate) fn on_click(&self, handle: &str, mutations: Vec<Mutation>) {
        self.lock().on_click.insert(handle.to_owned(), mutations);
    }

    /// Make clicking `handle` fail with a detached-element error.
    pub(crate) fn fail_click(&self, handle: &str) {
        self.lock().failing_clicks.insert(handle.to_owned());
    }

    /// Script mutations applied by the next scroll; batches are consumed
    /// in order, one per scroll.
    pub(crate) fn push_scroll_batch(&self, mutations: Vec<Mutation>) {
        self.lock().scroll_batches.push_back(mutations);
    }

    /// Script mutations applied after `selector` has been polled
    /// `after_calls` times, simulating asynchronous rendering.
    pub(crate) fn set_delayed(&self, selector: &str, after_calls: u32, mutations: Vec<Mutation>) {
        self.lock().delayed = Some((selector.to_owned(), after_calls, mutations));
    }

    pub(crate) fn fail_next_scroll(&self) {
        self.lock().fail_next_scroll = true;
    }

    pub(crate) fn clicks(&self) -> Vec<String> {
        self.lock().clicks.clone()
    }

    pub(crate) fn scroll_count(&self) -> usize {
        self.lock().scrolls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }
}

fn apply(inner: &mut Inner, mutations: Vec<Mutation>) {
    for mutation in mutations {
        match mutation {
            Mutation::Set(selector, elements) => {
                inner.selections.insert(selector, elements);
            }
            Mutation::Append(selector, elements) => {
                inner.selections.entry(selector).or_default().extend(elements);
            }
            Mutation::AddMarker(text) => inner.markers.push(text),
        }
    }
}

#[async_trait]
impl Document for FakeDocument {
    fn select_all(&self, selector: &str) -> Vec<Element> {
        let mut inner = self.lock();
        let fire = match inner.delayed.as_mut() {
            Some((delayed_selector, remaining, _)) if delayed_selector == selector => {
                if *remaining <= 1 {
                    true
                } else {
                    *remaining -= 1;
                    false
                }
            }
            _ => false,
        };
        if fire {
            if let Some((_, _, mutations)) = inner.delayed.take() {
                apply(&mut inner, mutations);
            }
        }
        inner.selections.get(selector).cloned().unwrap_or_default()
    }

    fn body_contains(&self, needle: &str) -> bool {
        self.lock().markers.iter().any(|m| m.contains(needle))
    }

    async fn click(&self, handle: &str) -> Result<(), DocumentError> {
        let mut inner = self.lock();
        inner.clicks.push(handle.to_owned());
        if inner.failing_clicks.contains(handle) {
            return Err(DocumentError::Detached {
                handle: handle.to_owned(),
            });
        }
        if let Some(mutations) = inner.on_click.remove(handle) {
            apply(&mut inner, mutations);
        }
        Ok(())
    }

    async fn scroll_to_bottom(&self, _selector: &str) -> Result<(), DocumentError> {
        let mut inner = self.lock();
        inner.scrolls += 1;
        if inner.fail_next_scroll {
            inner.fail_next_scroll = false;
            return Err(DocumentError::Driver("scroll target vanished".to_owned()));
        }
        if let Some(batch) = inner.scroll_batches.pop_front() {
            apply(&mut inner, batch);
        }
        Ok(())
    }
}

/// A detail pane for `name` that satisfies the readiness signals.
pub(crate) fn detail_pane(sel: &SelectorStrategy, name: &str) -> Vec<Mutation> {
    vec![
        Mutation::Set(sel.detail_headings[0].clone(), vec![el("h1", name)]),
        Mutation::Set(sel.item_actions.clone(), vec![el("save", "Save")]),
    ]
}

/// A feed entry link; handle doubles as the place id in the href.
pub(crate) fn entry_link(sel: &SelectorStrategy, handle: &str, card_text: &str) -> Mutation {
    Mutation::Append(
        sel.entry_links.clone(),
        vec![link(
            handle,
            card_text,
            &format!("https://www.google.com/maps/place/{handle}?hl=en"),
        )],
    )
}

/// Sink that records every event for later assertions.
#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl StatusSink for RecordingSink {
    fn emit(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

/// Engine context over a fake document with default strategy and config.
pub(crate) fn test_ctx(doc: Arc<FakeDocument>, sink: Arc<dyn StatusSink>) -> EngineCtx {
    EngineCtx {
        doc,
        sel: SelectorStrategy::maps_en_v1(),
        cfg: EngineConfig::default(),
        store: Arc::new(tokio::sync::Mutex::new(RecordStore::new())),
        sink,
        stop: StopFlag::new(),
    }
}
