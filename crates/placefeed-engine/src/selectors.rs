//! Selector strategy: every host-markup literal in one place.
//!
//! The engine is written against this struct, never against selector
//! literals, so a markup change on the host page means shipping a new
//! strategy constructor rather than touching traversal or extraction
//! logic. The strategy is also the unit of locale variation: the
//! end-of-feed marker and placeholder titles are locale-specific text.

/// Selector and marker literals for one host-page markup version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorStrategy {
    /// The scrollable feed container.
    pub feed_container: String,
    /// Place-detail links inside the feed; one per visible entry.
    pub entry_links: String,
    /// Detail-view title candidates, tried in order.
    pub detail_headings: Vec<String>,
    /// Main content region; its accessible label is the name fallback.
    pub main_region: String,
    /// Dedicated phone action control.
    pub phone_action: String,
    /// Website link carrying an href.
    pub website_link: String,
    /// Website control carrying only a label.
    pub website_action: String,
    /// Dedicated address action control.
    pub address_action: String,
    /// Every interactive control in the detail view.
    pub action_controls: String,
    /// Controls bound to the selected item; presence signals readiness.
    pub item_actions: String,
    /// Detail-view tab strip; presence signals readiness.
    pub tab_strip: String,
    /// Category action control; also a readiness signal.
    pub category_action: String,
    /// Elements carrying a star-rating accessible label.
    pub rating_nodes: String,
    /// Elements carrying a review-count accessible label.
    pub review_nodes: String,
    /// Short text nodes in the main region, for last-resort heuristics.
    pub text_nodes: String,
    /// Absolute links inside the main region.
    pub external_links: String,
    /// Visible text marking the end of the result feed.
    pub end_of_feed_marker: String,
    /// Titles the detail view shows before an item is selected.
    pub placeholder_titles: Vec<String>,
    /// Domains belonging to the host application; links to these are
    /// never a listing's own website.
    pub host_domains: Vec<String>,
}

impl SelectorStrategy {
    /// Strategy for the English-locale map results markup, first
    /// observed revision.
    #[must_use]
    pub fn maps_en_v1() -> Self {
        Self {
            feed_container: "div[role='feed']".into(),
            entry_links: "div[role='feed'] a[href*='/maps/place/']".into(),
            detail_headings: vec![
                "h1.DUwDvf".into(),
                "div[role='main'] h1".into(),
                "h1.fontHeadlineLarge".into(),
            ],
            main_region: "div[role='main'][aria-label]".into(),
            phone_action: "button[data-item-id^='phone']".into(),
            website_link: "a[data-item-id='authority']".into(),
            website_action: "button[data-item-id='authority']".into(),
            address_action: "button[data-item-id='address']".into(),
            action_controls: "div[role='main'] button, div[role='main'] a".into(),
            item_actions: "button[data-item-id]".into(),
            tab_strip: "div[role='tablist']".into(),
            category_action: "button[jsaction*='category']".into(),
            rating_nodes: "div[role='main'] [role='img'][aria-label*='star']".into(),
            review_nodes: "div[role='main'] [aria-label*='review']".into(),
            text_nodes: "div[role='main'] span".into(),
            external_links: "div[role='main'] a[href^='http']".into(),
            end_of_feed_marker: "You've reached the end of the list".into(),
            placeholder_titles: vec!["Results".into(), "Google Maps".into()],
            host_domains: vec![
                "google.".into(),
                "gstatic.com".into(),
                "googleusercontent.com".into(),
            ],
        }
    }

    /// Whether `title` is one of the known pre-selection placeholders.
    #[must_use]
    pub fn is_placeholder(&self, title: &str) -> bool {
        self.placeholder_titles.iter().any(|p| p == title)
    }

    /// Whether `url` points at the host application rather than an
    /// external site.
    #[must_use]
    pub fn is_host_url(&self, url: &str) -> bool {
        let host = url
            .split("://")
            .nth(1)
            .unwrap_or(url)
            .split('/')
            .next()
            .unwrap_or("");
        self.host_domains.iter().any(|d| host.contains(d.as_str()))
    }
}

impl Default for SelectorStrategy {
    fn default() -> Self {
        Self::maps_en_v1()
    }
}
