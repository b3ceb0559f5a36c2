use crate::filter::DealFilterConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::DealError;

/// Configuration for one retailer's deal collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailerConfig {
    /// Short identifier for logging and CLI selection
    pub name: String,

    /// Base URL relative hrefs are resolved against
    pub base_url: String,

    /// Page paths to fetch, in order
    pub page_paths: Vec<String>,

    /// Candidate inclusion/exclusion rules
    #[serde(flatten)]
    pub filter: DealFilterConfig,

    /// Whether to run discount-label extraction over anchor context windows
    #[serde(default)]
    pub extract_discount_label: bool,
}

impl RetailerConfig {
    /// Load a retailer configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DealError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Parse a retailer configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, DealError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Costco Korea: special-price and online-deal listing pages.
    /// Only product-page anchors count, and discount labels are harvested
    /// from the surrounding markup.
    pub fn costco() -> Self {
        Self {
            name: "costco".to_string(),
            base_url: "https://www.costco.co.kr".to_string(),
            page_paths: vec![
                "/c/SpecialPriceOffers".to_string(),
                "/c/OnlineDeals".to_string(),
            ],
            filter: DealFilterConfig {
                require_path_segments: vec!["/p/".to_string(), "/product/".to_string()],
                ..Default::default()
            },
            extract_discount_label: true,
        }
    }

    /// E-Mart Traders: front page plus event/special listings. Anchors must
    /// look like a deal AND carry the Traders brand marker; competitor
    /// domains are dropped. The site does not expose usable discount text,
    /// so label extraction stays off.
    pub fn traders() -> Self {
        Self {
            name: "traders".to_string(),
            base_url: "https://traders.ssg.com".to_string(),
            page_paths: vec![
                "/".to_string(),
                "/event/eventMain.ssg".to_string(),
                "/special/index.ssg".to_string(),
            ],
            filter: DealFilterConfig {
                require_path_segments: Vec::new(),
                include_keywords: Some(
                    "(event|deal|special|promotion|goods|product|sale|기획|이벤트|특가)"
                        .to_string(),
                ),
                require_marker: Some("(traders|트레이더스)".to_string()),
                exclude_keywords: Some("(costco|coupang|11st|gmarket|auction)".to_string()),
            },
            extract_discount_label: false,
        }
    }
}
