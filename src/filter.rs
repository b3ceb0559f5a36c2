use regex::Regex;
use serde::{Deserialize, Serialize};

/// Per-retailer inclusion/exclusion rules for harvested anchors.
///
/// All regex fields are matched case-insensitively. Patterns are kept as
/// strings here so retailer configurations stay (de)serializable; they are
/// compiled once into a [`DealFilter`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealFilterConfig {
    /// URL path segments, any of which must appear in the raw `href`
    /// (e.g. `/p/` for product pages). Empty means no path restriction.
    #[serde(default)]
    pub require_path_segments: Vec<String>,

    /// Keyword pattern that must match the merged href+title text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_keywords: Option<String>,

    /// Brand marker pattern that must match the resolved URL or the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_marker: Option<String>,

    /// Pattern that rejects a candidate when it matches the resolved URL
    /// (known competitor domains and similar noise). Takes precedence over
    /// the include rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_keywords: Option<String>,
}

/// Candidate filter compiled from a [`DealFilterConfig`]
#[derive(Debug)]
pub struct DealFilter {
    require_path_segments: Vec<String>,
    include_keywords: Option<Regex>,
    require_marker: Option<Regex>,
    exclude_keywords: Option<Regex>,
}

impl DealFilter {
    /// Compile a filter from configuration
    pub fn new(config: &DealFilterConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            require_path_segments: config.require_path_segments.clone(),
            include_keywords: compile(config.include_keywords.as_deref())?,
            require_marker: compile(config.require_marker.as_deref())?,
            exclude_keywords: compile(config.exclude_keywords.as_deref())?,
        })
    }

    /// Determine whether a candidate anchor survives this retailer's rules.
    ///
    /// `href` is the raw attribute value, `title` the normalized anchor text,
    /// `url` the resolved absolute URL.
    pub fn accepts(&self, href: &str, title: &str, url: &str) -> bool {
        // Exclusions take precedence over everything else
        if let Some(exclude) = &self.exclude_keywords {
            if exclude.is_match(url) {
                return false;
            }
        }

        if !self.require_path_segments.is_empty()
            && !self
                .require_path_segments
                .iter()
                .any(|seg| href.contains(seg.as_str()))
        {
            return false;
        }

        if let Some(include) = &self.include_keywords {
            let merged = format!("{href}{title}");
            if !include.is_match(&merged) {
                return false;
            }
        }

        if let Some(marker) = &self.require_marker {
            if !marker.is_match(url) && !marker.is_match(title) {
                return false;
            }
        }

        true
    }
}

/// Compile an optional pattern case-insensitively
fn compile(pattern: Option<&str>) -> Result<Option<Regex>, regex::Error> {
    match pattern {
        Some(p) => Ok(Some(Regex::new(&format!("(?i){p}"))?)),
        None => Ok(None),
    }
}
