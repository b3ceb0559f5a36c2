use regex::Regex;
use scraper::Html;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::discount;
use crate::filter::DealFilter;
use crate::records::DealRecord;

/// Default per-page candidate cap. This is an early-exit bound for one page
/// pass, not a result-size guarantee across a whole collection run.
pub const DEFAULT_PAGE_CAP: usize = 30;

/// Raw markup span taken before an anchor's match offset when building the
/// discount-label context window.
const CONTEXT_BEFORE: usize = 350;

/// Raw markup span taken after an anchor's match offset.
const CONTEXT_AFTER: usize = 500;

// Anchor elements with an href, captured together with their inner markup.
// Attribute-order sensitive by construction; see the module docs.
static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a[^>]+href="([^"]+)"[^>]*>(.*?)</a>"#)
        .expect("anchor pattern should be valid")
});

/// Options controlling one harvest pass
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Run discount-label extraction over anchor context windows
    pub extract_discount_label: bool,

    /// Stop collecting after this many candidates
    pub page_cap: usize,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            extract_discount_label: false,
            page_cap: DEFAULT_PAGE_CAP,
        }
    }
}

/// Extract candidate deal records from one page's HTML.
///
/// Anchors are scanned in document order and that order is preserved in the
/// output. Candidates with an empty href, an empty title, or a title shorter
/// than 4 characters are discarded as noise. Output is deduplicated by
/// (title, url) within this single page; cross-page deduplication is the
/// collector's job.
pub fn harvest(
    html: &str,
    base_url: &str,
    filter: &DealFilter,
    opts: &HarvestOptions,
) -> Vec<DealRecord> {
    let mut records = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for caps in ANCHOR.captures_iter(html) {
        let href = caps.get(1).map_or("", |m| m.as_str());
        let inner = caps.get(2).map_or("", |m| m.as_str());

        let title = inner_text(inner);
        if href.is_empty() || title.is_empty() || title.chars().count() < 4 {
            continue;
        }

        let url = resolve_url(base_url, href);
        if !filter.accepts(href, &title, &url) {
            continue;
        }

        let key = (title.clone(), url.clone());
        if seen.contains(&key) {
            continue;
        }

        let discount_label = if opts.extract_discount_label {
            let offset = caps.get(0).map_or(0, |m| m.start());
            let window = context_window(html, offset);
            discount::extract_label(&format!("{title} {window}"))
        } else {
            None
        };

        seen.insert(key);
        records.push(DealRecord::new(title, url, discount_label));
        if records.len() >= opts.page_cap {
            break;
        }
    }

    ::log::debug!("harvested {} candidates from page", records.len());
    records
}

/// Strip nested markup from anchor inner HTML and normalize whitespace
fn inner_text(inner: &str) -> String {
    let fragment = Html::parse_fragment(inner);
    fragment
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve an href against the retailer's base URL.
///
/// An href that already carries a scheme is used as-is. Otherwise the two
/// sides are concatenated with exactly one joining slash; this is deliberate
/// string concatenation, not full RFC 3986 resolution.
pub fn resolve_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{base}{href}")
    } else {
        format!("{base}/{href}")
    }
}

/// Slice of raw markup surrounding an anchor's match offset, clipped to the
/// document bounds and snapped to UTF-8 character boundaries.
fn context_window(html: &str, offset: usize) -> &str {
    let start = floor_char_boundary(html, offset.saturating_sub(CONTEXT_BEFORE));
    let end = floor_char_boundary(html, (offset + CONTEXT_AFTER).min(html.len()));
    &html[start..end]
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DealFilter, DealFilterConfig};

    fn open_filter() -> DealFilter {
        DealFilter::new(&DealFilterConfig::default()).unwrap()
    }

    #[test]
    fn test_document_order_preserved() {
        let html = r#"
            <a href="/p/1">첫번째 상품</a>
            <a href="/p/2">두번째 상품</a>
            <a href="/p/3">세번째 상품</a>
        "#;
        let records = harvest(html, "https://x.kr", &open_filter(), &HarvestOptions::default());
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["첫번째 상품", "두번째 상품", "세번째 상품"]);
    }

    #[test]
    fn test_short_titles_discarded() {
        let html = r#"<a href="/p/1">OK</a><a href="/p/2">네글자네</a>"#;
        let records = harvest(html, "https://x.kr", &open_filter(), &HarvestOptions::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "네글자네");
    }

    #[test]
    fn test_nested_markup_stripped() {
        let html = r#"<a href="/p/9"><span class="name">삼겹살</span> <b>1kg</b> 행사</a>"#;
        let records = harvest(html, "https://x.kr", &open_filter(), &HarvestOptions::default());
        assert_eq!(records[0].title, "삼겹살 1kg 행사");
    }

    #[test]
    fn test_url_resolution() {
        assert_eq!(
            resolve_url("https://example.com", "/p/123"),
            "https://example.com/p/123"
        );
        assert_eq!(
            resolve_url("https://example.com", "p/123"),
            "https://example.com/p/123"
        );
        assert_eq!(
            resolve_url("https://example.com/", "/p/123"),
            "https://example.com/p/123"
        );
        assert_eq!(
            resolve_url("https://example.com", "https://other.com/p/1"),
            "https://other.com/p/1"
        );
    }

    #[test]
    fn test_within_page_dedup() {
        let html = r#"
            <a href="/p/1">같은 상품</a>
            <a href="/p/1">같은 상품</a>
            <a href="/p/2">같은 상품</a>
        "#;
        let records = harvest(html, "https://x.kr", &open_filter(), &HarvestOptions::default());
        // Same title, different URL stays; exact (title, url) repeat collapses
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_page_cap_is_early_exit() {
        let html: String = (0..40)
            .map(|i| format!(r#"<a href="/p/{i}">상품 번호 {i}</a>"#))
            .collect();
        let records = harvest(&html, "https://x.kr", &open_filter(), &HarvestOptions::default());
        assert_eq!(records.len(), DEFAULT_PAGE_CAP);
        assert_eq!(records[0].title, "상품 번호 0");
    }

    #[test]
    fn test_discount_label_from_context_window() {
        // The label text sits outside the anchor, in nearby markup
        let html = r#"<div><a href="/p/7">한가득 만두 세트</a><span class="coupon">3,000원 할인</span></div>"#;
        let opts = HarvestOptions {
            extract_discount_label: true,
            ..Default::default()
        };
        let records = harvest(html, "https://x.kr", &open_filter(), &opts);
        assert_eq!(records[0].discount_label.as_deref(), Some("3,000원 할인"));
    }

    #[test]
    fn test_no_label_when_extraction_disabled() {
        let html = r#"<a href="/p/7">만두 세트 3,000원 할인</a>"#;
        let records = harvest(html, "https://x.kr", &open_filter(), &HarvestOptions::default());
        assert_eq!(records[0].discount_label, None);
    }

    #[test]
    fn test_context_window_clipped_on_multibyte_text() {
        // Dense multibyte text around the anchor; slicing must not panic on
        // a non-boundary byte index.
        let pad = "한글데이터".repeat(100);
        let html = format!(r#"{pad}<a href="/p/1">경계값 확인 상품</a>{pad}"#);
        let opts = HarvestOptions {
            extract_discount_label: true,
            ..Default::default()
        };
        let records = harvest(&html, "https://x.kr", &open_filter(), &opts);
        assert_eq!(records.len(), 1);
    }
}
