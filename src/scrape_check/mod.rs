use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ScrapeCheckError;

const TITLE_PREVIEW_CHARS: usize = 50;

/// Result document produced by the external scraper
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeReport {
    #[serde(default)]
    pub success: bool,
    pub data: Option<ScrapeData>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeData {
    pub site: Option<String>,
    #[serde(default)]
    pub items: Vec<ScrapeItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeItem {
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub site: String,
    pub item_count: usize,
    pub first_title: Option<String>,
}

impl ScrapeReport {
    pub fn from_json(json: &str) -> Result<Self, ScrapeCheckError> {
        Ok(serde_json::from_str(json)?)
    }

    /// `data` is only read once `success` has been checked.
    pub fn summarize(&self) -> Result<ScrapeSummary, ScrapeCheckError> {
        if !self.success {
            let message = self
                .error
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!("❌ Scraper test failed: {}", message);
            return Err(ScrapeCheckError::Failed(message));
        }

        let (site, items) = match &self.data {
            Some(data) => (data.site.clone(), data.items.as_slice()),
            None => (None, &[][..]),
        };

        let first_title = items.first().map(|item| {
            let title = item.title.as_deref().unwrap_or("N/A");
            title.chars().take(TITLE_PREVIEW_CHARS).collect::<String>()
        });

        let summary = ScrapeSummary {
            site: site.unwrap_or_else(|| "N/A".to_string()),
            item_count: items.len(),
            first_title,
        };
        info!("✅ Scraper test successful: {} items from {}", summary.item_count, summary.site);
        Ok(summary)
    }
}
