//! Per-field extractors over the rendered detail view.
//!
//! Each extractor is an ordered fallback chain; the first strategy that
//! yields a non-empty, validated value wins. All extractors are read-only
//! against the document — interaction belongs to the card scraper.

use regex::Regex;

use crate::dom::Document;
use crate::selectors::SelectorStrategy;

/// Compiled text patterns shared by the extractors.
///
/// Compiled once per scrape, not per field; all patterns are static and
/// known-valid.
pub struct Patterns {
    /// At least 7 digits allowing separators, optional leading `+`/`(`.
    phone: Regex,
    url: Regex,
    star_rating: Regex,
    review_label: Regex,
    bare_count: Regex,
    bare_rating: Regex,
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

impl Patterns {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phone: Regex::new(r"[+(]?\d[\d\s().\-/]{5,}\d").expect("valid regex"),
            url: Regex::new(r#"https?://[^\s"']+"#).expect("valid regex"),
            star_rating: Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*star").expect("valid regex"),
            review_label: Regex::new(r"(?i)(\d[\d,]*)\s*review").expect("valid regex"),
            bare_count: Regex::new(r"^\(?(\d[\d,]*)\)?$").expect("valid regex"),
            bare_rating: Regex::new(r"^\d\.\d$").expect("valid regex"),
        }
    }
}

/// The title currently shown by the detail view: the first heading whose
/// text is non-empty and not a known placeholder.
///
/// Shared by the name extractor and the detail-ready detector, which
/// infers readiness from this title changing.
pub(crate) fn displayed_name(doc: &dyn Document, sel: &SelectorStrategy) -> Option<String> {
    for heading in &sel.detail_headings {
        for element in doc.select_all(heading) {
            let title = element.text.trim();
            if !title.is_empty() && !sel.is_placeholder(title) {
                return Some(title.to_owned());
            }
        }
    }
    None
}

/// Listing name: heading chain, then the main region's accessible label.
pub fn extract_name(doc: &dyn Document, sel: &SelectorStrategy) -> Option<String> {
    if let Some(name) = displayed_name(doc, sel) {
        return Some(name);
    }
    let label = doc.select_first(&sel.main_region)?.aria_label?;
    let label = label.trim();
    if label.is_empty() || sel.is_placeholder(label) {
        return None;
    }
    Some(label.to_owned())
}

/// Phone number from the detail view.
///
/// Chain: the dedicated phone control's label with its `Phone:` prefix
/// stripped; any control whose label begins with `Phone`; a digit-pattern
/// scan over every interactive control.
pub fn extract_phone(doc: &dyn Document, sel: &SelectorStrategy, pat: &Patterns) -> Option<String> {
    if let Some(control) = doc.select_first(&sel.phone_action) {
        let label = strip_label_prefix(control.label_or_text(), "Phone");
        if pat.phone.is_match(&label) {
            return Some(normalize_phone(&label));
        }
    }

    for control in doc.select_all(&sel.action_controls) {
        let raw = control.label_or_text();
        if let Some(rest) = raw.strip_prefix("Phone") {
            let label = rest.trim_start_matches([':', ' ']).to_owned();
            if pat.phone.is_match(&label) {
                return Some(normalize_phone(&label));
            }
        }
    }

    for control in doc.select_all(&sel.action_controls) {
        if let Some(found) = phone_from_text(control.label_or_text(), pat) {
            return Some(found);
        }
    }

    None
}

/// Digit-pattern phone scan over arbitrary text.
///
/// Also serves as the card-level fallback, run against a feed entry's
/// container text before the detail view is opened.
pub fn phone_from_text(text: &str, pat: &Patterns) -> Option<String> {
    for candidate in pat.phone.find_iter(text) {
        let digits = candidate
            .as_str()
            .chars()
            .filter(char::is_ascii_digit)
            .count();
        if digits >= 7 {
            return Some(normalize_phone(candidate.as_str()));
        }
    }
    None
}

/// Website URL: authority link href, authority control label, then the
/// first external absolute link in the main region.
pub fn extract_website(doc: &dyn Document, sel: &SelectorStrategy, pat: &Patterns) -> Option<String> {
    if let Some(href) = doc.select_first(&sel.website_link).and_then(|el| el.href) {
        if !href.trim().is_empty() {
            return Some(href);
        }
    }

    if let Some(control) = doc.select_first(&sel.website_action) {
        let raw = control.label_or_text();
        if let Some(url) = pat.url.find(raw) {
            return Some(url.as_str().to_owned());
        }
        let label = strip_label_prefix(raw, "Website");
        if !label.is_empty() {
            return Some(label);
        }
    }

    doc.select_all(&sel.external_links)
        .into_iter()
        .filter_map(|el| el.href)
        .find(|href| !sel.is_host_url(href))
}

/// Street address from the dedicated address control.
pub fn extract_address(doc: &dyn Document, sel: &SelectorStrategy) -> Option<String> {
    let control = doc.select_first(&sel.address_action)?;
    let label = strip_label_prefix(control.label_or_text(), "Address");
    if label.is_empty() {
        return None;
    }
    Some(label)
}

/// Star rating as display text, e.g. `"4.5"`.
pub fn extract_rating(doc: &dyn Document, sel: &SelectorStrategy, pat: &Patterns) -> Option<String> {
    for node in doc.select_all(&sel.rating_nodes) {
        if let Some(caps) = pat.star_rating.captures(node.label_or_text()) {
            return Some(caps[1].to_owned());
        }
    }

    // Bare `D.D` text node near the review area.
    doc.select_all(&sel.text_nodes)
        .into_iter()
        .map(|el| el.text.trim().to_owned())
        .find(|text| pat.bare_rating.is_match(text))
}

/// Review count with thousands separators stripped.
///
/// Chain: the star-rating label's `N review` segment; any element whose
/// accessible label matches `N reviews`; a bare parenthesized or plain
/// positive integer text node (low confidence, logged).
pub fn extract_review_count(
    doc: &dyn Document,
    sel: &SelectorStrategy,
    pat: &Patterns,
) -> Option<String> {
    for node in doc.select_all(&sel.rating_nodes) {
        if let Some(caps) = pat.review_label.captures(node.label_or_text()) {
            return Some(strip_separators(&caps[1]));
        }
    }

    for node in doc.select_all(&sel.review_nodes) {
        if let Some(caps) = pat.review_label.captures(node.label_or_text()) {
            return Some(strip_separators(&caps[1]));
        }
    }

    for node in doc.select_all(&sel.text_nodes) {
        let text = node.text.trim();
        if let Some(caps) = pat.bare_count.captures(text) {
            let count = strip_separators(&caps[1]);
            if count.parse::<u64>().is_ok_and(|n| n > 0) {
                tracing::debug!(matched = text, "low-confidence review count from bare integer");
                return Some(count);
            }
        }
    }

    None
}

/// Listing category: category control, star-rating hotel label, then a
/// heuristic scan of short capitalized text nodes.
pub fn extract_category(doc: &dyn Document, sel: &SelectorStrategy, pat: &Patterns) -> Option<String> {
    if let Some(control) = doc.select_first(&sel.category_action) {
        let text = control.label_or_text().trim().to_owned();
        if !text.is_empty() {
            return Some(text);
        }
    }

    for node in doc.select_all(&sel.rating_nodes) {
        let label = node.label_or_text();
        let lower = label.to_lowercase();
        if lower.contains("star") && lower.contains("hotel") {
            return Some(label.trim().to_owned());
        }
    }

    doc.select_all(&sel.text_nodes)
        .into_iter()
        .map(|el| el.text.trim().to_owned())
        .find(|text| looks_like_category(text, pat))
}

/// Heuristic: at most four words, capitalized, no digits, and none of the
/// markers that identify rating or opening-hours text.
fn looks_like_category(text: &str, pat: &Patterns) -> bool {
    if text.is_empty() || text.split_whitespace().count() > 4 {
        return false;
    }
    if text.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    if !text.chars().next().is_some_and(char::is_uppercase) {
        return false;
    }
    let lower = text.to_lowercase();
    if lower.contains("star") || lower.contains("open") || lower.contains("close") {
        return false;
    }
    if text.contains('·') || text.contains('⋅') || pat.bare_rating.is_match(text) {
        return false;
    }
    true
}

/// Strips a leading `"{prefix}:"` or `"{prefix}"` and trims.
fn strip_label_prefix(raw: &str, prefix: &str) -> String {
    let rest = raw.strip_prefix(prefix).unwrap_or(raw);
    rest.trim_start_matches([':', ' ']).trim().to_owned()
}

/// Trims whitespace and trailing punctuation/separator characters.
fn normalize_phone(raw: &str) -> String {
    raw.trim()
        .trim_end_matches([' ', '.', ',', '-', ';', ':', '·'])
        .to_owned()
}

fn strip_separators(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
