use std::time::Duration;

use reqwest::Client;

use crate::config::RetailerConfig;
use crate::dedup::dedup_records;
use crate::error::DealError;
use crate::filter::DealFilter;
use crate::harvest::{self, HarvestOptions, resolve_url};
use crate::records::{DealSnapshot, PageOutcome};

/// Final cap on `items` in a snapshot. `total` still reports the full
/// deduplicated count.
pub const DEFAULT_SNAPSHOT_CAP: usize = 20;

/// Descriptive client identifier sent with every outbound request
pub const USER_AGENT: &str = "Mozilla/5.0 (moabom)";

/// Per-request timeout. A hung retailer page should cost one page's
/// contribution, not stall the whole run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Options controlling one collection run
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Per-page candidate cap passed through to the harvester
    pub page_cap: usize,

    /// Final snapshot item cap
    pub snapshot_cap: usize,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            page_cap: harvest::DEFAULT_PAGE_CAP,
            snapshot_cap: DEFAULT_SNAPSHOT_CAP,
        }
    }
}

/// Build the HTTP client used for retailer fetches
pub fn http_client(timeout: Duration) -> Result<Client, DealError> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Collect one retailer's deals into a fresh snapshot.
///
/// Pages are fetched one after another, each full round-trip completing
/// before the next begins. A failed page is skipped and the run continues;
/// if every page fails the result is an empty snapshot, never an error.
/// The only error path is construction-time: an invalid filter pattern in
/// the retailer configuration.
pub async fn collect_deals(
    client: &Client,
    retailer: &RetailerConfig,
    opts: &CollectOptions,
) -> Result<DealSnapshot, DealError> {
    let (snapshot, _) = collect_deals_detailed(client, retailer, opts).await?;
    Ok(snapshot)
}

/// Like [`collect_deals`], but also returns the per-page fetch outcomes so
/// callers can inspect partial runs.
pub async fn collect_deals_detailed(
    client: &Client,
    retailer: &RetailerConfig,
    opts: &CollectOptions,
) -> Result<(DealSnapshot, Vec<PageOutcome>), DealError> {
    let filter = DealFilter::new(&retailer.filter)?;
    let harvest_opts = HarvestOptions {
        extract_discount_label: retailer.extract_discount_label,
        page_cap: opts.page_cap,
    };

    let mut all = Vec::new();
    let mut outcomes = Vec::with_capacity(retailer.page_paths.len());

    for path in &retailer.page_paths {
        let url = resolve_url(&retailer.base_url, path);
        let result = fetch_page(client, &url).await;

        match &result {
            Ok(html) => {
                let records = harvest::harvest(html, &retailer.base_url, &filter, &harvest_opts);
                ::log::info!(
                    "{}: {} -> {} candidates",
                    retailer.name,
                    path,
                    records.len()
                );
                all.extend(records);
            }
            Err(reason) => {
                // A single page failure never aborts the collection
                ::log::warn!("{}: skipping {} ({})", retailer.name, path, reason);
            }
        }

        outcomes.push(PageOutcome {
            path: path.clone(),
            result,
        });
    }

    let deduped = dedup_records(all);
    Ok((DealSnapshot::build(deduped, opts.snapshot_cap), outcomes))
}

/// Fetch one page's HTML, bypassing shared response caches.
///
/// Failures are folded into a human-readable reason string; the caller
/// records them in a [`PageOutcome`] rather than propagating.
async fn fetch_page(client: &Client, url: &str) -> Result<String, String> {
    let response = client
        .get(url)
        .header(reqwest::header::CACHE_CONTROL, "no-cache")
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status.as_u16()));
    }

    response.text().await.map_err(|e| e.to_string())
}
