use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::analysis::{Classifier, Summarizer};
use crate::config::Config;
use crate::feed::{FeedClient, FeedEntry};
use crate::scheduler;
use crate::store::{DecisionFields, DecisionLabel, RecordStore};

/// Ingestion pipeline: poll the feed, summarize and classify each unseen
/// entry, persist one decision record per distinct URL.
pub struct Analyzer {
    feed: FeedClient,
    summarizer: Summarizer,
    classifier: Classifier,
    store: Arc<dyn RecordStore>,
    poll_interval: Duration,
}

impl Analyzer {
    pub fn new(config: &Config, store: Arc<dyn RecordStore>) -> Self {
        Self {
            feed: FeedClient::new(&config.feed),
            summarizer: Summarizer::new(config.summarizer.clone()),
            classifier: Classifier::new(config.classifier.clone()),
            store,
            poll_interval: Duration::from_secs(config.agent.poll_interval_secs),
        }
    }

    /// Run the ingestion loop forever, one pass per poll interval.
    pub async fn run(&self) -> Result<()> {
        info!("🗞️  Starting the news analysis loop");
        scheduler::run_on_interval(self.poll_interval, || self.process_feed()).await;
        Ok(())
    }

    /// One full pass over the feed. Per-entry failures are logged and do not
    /// abort the rest of the batch.
    pub async fn process_feed(&self) -> Result<()> {
        info!("Starting feed processing");

        let entries = self.feed.fetch_latest().await?;
        for entry in entries {
            if let Err(e) = self.process_entry(&entry).await {
                error!("Error processing entry {}: {:#}", entry.title, e);
            }
        }

        info!("Finished feed processing");
        Ok(())
    }

    async fn process_entry(&self, entry: &FeedEntry) -> Result<()> {
        // Dedup pre-check; any existing record for this URL means skip.
        // Not atomic with the insert below, so concurrent passes can race.
        let existing = self.store.find_decisions_by_url(&entry.link).await?;
        if !existing.is_empty() {
            info!("Skipped existing article: {}", entry.title);
            return Ok(());
        }

        let description = entry.description.clone().unwrap_or_default();
        let summary = self.summarizer.summarize(&entry.link).await?;
        let classification = self
            .classifier
            .classify(&summary, &entry.title, &description)
            .await?;

        let fields = DecisionFields {
            title: entry.title.clone(),
            url: entry.link.clone(),
            description,
            decision: Some(DecisionLabel::One(classification.decision)),
            symbol: classification.symbol,
            summary: classification.explanation,
            analysis: Some(summary),
            processed: false,
        };
        self.store.insert_decision(&fields).await?;

        info!("Processed new article: {}", entry.title);
        Ok(())
    }
}
