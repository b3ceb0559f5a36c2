// Re-export modules
pub mod apod;
pub mod collect;
pub mod config;
pub mod dedup;
pub mod discount;
pub mod error;
pub mod filter;
pub mod harvest;
pub mod living_cost;
pub mod records;
pub mod watchlist;

// Re-export commonly used types for convenience
pub use config::RetailerConfig;
pub use error::DealError;
pub use records::{DealRecord, DealSnapshot};

use std::path::Path;
use std::time::Duration;

use collect::CollectOptions;

/// Builder for one retailer deal-collection run.
///
/// A run is a pure function from configuration to snapshot: nothing is
/// cached or kept between runs.
pub struct Deals {
    retailer: RetailerConfig,
    timeout: Duration,
    opts: CollectOptions,
}

impl Deals {
    /// Create a builder for the given retailer configuration
    pub fn for_retailer(retailer: RetailerConfig) -> Self {
        Self {
            retailer,
            timeout: collect::DEFAULT_TIMEOUT,
            opts: CollectOptions::default(),
        }
    }

    /// Load the retailer configuration from a JSON file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self, DealError> {
        Ok(Self::for_retailer(RetailerConfig::from_file(path)?))
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the per-page candidate cap
    pub fn with_page_cap(mut self, cap: usize) -> Self {
        self.opts.page_cap = cap;
        self
    }

    /// Override the final snapshot item cap
    pub fn with_snapshot_cap(mut self, cap: usize) -> Self {
        self.opts.snapshot_cap = cap;
        self
    }

    /// Run the collection and return a fresh snapshot.
    ///
    /// Errors only for construction-time faults (invalid filter pattern,
    /// client build failure); page fetch faults degrade to a partial or
    /// empty snapshot instead.
    pub async fn collect(self) -> Result<DealSnapshot, DealError> {
        let client = collect::http_client(self.timeout)?;
        collect::collect_deals(&client, &self.retailer, &self.opts).await
    }
}
