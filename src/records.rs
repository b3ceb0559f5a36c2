use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One harvested promotional item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRecord {
    /// Human-readable name, whitespace-normalized, at least 4 characters
    pub title: String,

    /// Absolute URL of the item page
    pub url: String,

    /// Discount label if a recognizable pattern was found near the anchor
    #[serde(rename = "discountLabel", skip_serializing_if = "Option::is_none")]
    pub discount_label: Option<String>,
}

impl DealRecord {
    /// Create a new deal record
    pub fn new(title: String, url: String, discount_label: Option<String>) -> Self {
        Self {
            title,
            url,
            discount_label,
        }
    }

    /// Key used for deduplication: exact (title, url), case-sensitive
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.title, &self.url)
    }
}

/// The externally visible result of one collection run.
///
/// Constructed fresh on every run and never mutated afterwards. `total`
/// counts the deduplicated records BEFORE truncation, so `items` may be a
/// prefix of the full set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealSnapshot {
    /// ISO-8601 timestamp of snapshot construction
    #[serde(rename = "updatedAt")]
    pub updated_at: String,

    /// Count of deduplicated records before truncation
    pub total: usize,

    /// Deduplicated records, truncated to the snapshot cap
    pub items: Vec<DealRecord>,
}

impl DealSnapshot {
    /// Wrap deduplicated records into a timestamped snapshot, truncating
    /// `items` to `cap` while `total` keeps the pre-truncation count.
    pub fn build(mut records: Vec<DealRecord>, cap: usize) -> Self {
        let total = records.len();
        records.truncate(cap);
        Self {
            updated_at: now_iso(),
            total,
            items: records,
        }
    }

}

/// Outcome of fetching a single configured page path.
///
/// A failed page is skipped, never fatal; keeping the reason around lets
/// callers log or inspect partial runs without changing control flow.
#[derive(Debug)]
pub struct PageOutcome {
    /// The configured page path this outcome belongs to
    pub path: String,

    /// Raw HTML on success, or a human-readable failure reason
    pub result: Result<String, String>,
}

/// Current time as an ISO-8601 string
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
