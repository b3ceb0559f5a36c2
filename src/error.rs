use thiserror::Error;

/// Errors surfaced at the crate boundary.
///
/// Per-page fetch faults inside a collection run are NOT represented here;
/// those are recovered locally (the page is skipped) and a run degrades to
/// an empty snapshot rather than erroring.
#[derive(Debug, Error)]
pub enum DealError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid filter pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("upstream feed {feed} returned HTTP {status}")]
    UpstreamStatus { feed: String, status: u16 },
}
