use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::DealError;

/// NASA Astronomy Picture of the Day, as the upstream API shapes it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Apod {
    pub date: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub media_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

const APOD_ENDPOINT: &str = "https://api.nasa.gov/planetary/apod";

/// Fetch today's picture. Unlike the deal pipeline this surfaces its
/// failure to the caller; the dashboard falls back at the card level.
pub async fn get_apod(client: &Client) -> Result<Apod, DealError> {
    let key = std::env::var("NASA_API_KEY").unwrap_or_else(|_| "DEMO_KEY".to_string());

    let response = client
        .get(APOD_ENDPOINT)
        .query(&[("api_key", key.as_str()), ("thumbs", "true")])
        .header(reqwest::header::CACHE_CONTROL, "no-cache")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DealError::UpstreamStatus {
            feed: "nasa-apod".to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apod_deserializes_with_missing_optionals() {
        let json = r#"{
            "date": "2026-08-29",
            "title": "The Milky Way over the desert",
            "url": "https://apod.nasa.gov/apod/image/today.jpg",
            "media_type": "image"
        }"#;
        let apod: Apod = serde_json::from_str(json).unwrap();
        assert_eq!(apod.media_type, "image");
        assert!(apod.hdurl.is_none());
        assert!(apod.thumbnail_url.is_none());
    }
}
