use anyhow::Result;
use feed_rs::parser;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::FeedConfig;

/// One item pulled from the news feed. Ephemeral; refetched every poll.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub link: String,
    pub title: String,
    pub description: Option<String>,
}

pub struct FeedClient {
    http_client: Client,
    url: String,
    max_entries: usize,
}

impl FeedClient {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            url: config.url.clone(),
            max_entries: config.max_entries,
        }
    }

    /// Fetch the feed and return at most `max_entries` of the latest items,
    /// in the order the feed delivers them.
    pub async fn fetch_latest(&self) -> Result<Vec<FeedEntry>> {
        debug!("Fetching feed from {}", self.url);

        let resp = self.http_client.get(&self.url).send().await?;
        if !resp.status().is_success() {
            anyhow::bail!("Feed returned status {}", resp.status());
        }

        let body = resp.bytes().await?;
        let feed = parser::parse(body.as_ref())?;

        let mut entries = Vec::new();
        for entry in feed.entries.into_iter().take(self.max_entries) {
            let Some(link) = entry.links.first().map(|l| l.href.clone()) else {
                warn!("Skipping feed entry without a link");
                continue;
            };
            entries.push(FeedEntry {
                link,
                title: entry.title.map(|t| t.content).unwrap_or_default(),
                description: entry.summary.map(|s| s.content),
            });
        }

        debug!("Fetched {} feed entries", entries.len());
        Ok(entries)
    }
}
