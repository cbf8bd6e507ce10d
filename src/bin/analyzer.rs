use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsflow_agent::analyzer::Analyzer;
use newsflow_agent::config::Config;
use newsflow_agent::store::AirtableStore;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newsflow_agent=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    print_banner(&config);

    let store = Arc::new(AirtableStore::new(&config.airtable));
    let analyzer = Analyzer::new(&config, store);

    analyzer.run().await
}

fn print_banner(config: &Config) {
    println!("\n╔═══════════════════════════════════════════════════════════╗");
    println!("║              Newsflow Agent — Feed Analyzer               ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();
    println!("🗞️  Feed: {}", config.feed.url);
    println!("📰 Max entries per poll: {}", config.feed.max_entries);
    println!("🧠 Summarizer model: {}", config.summarizer.model);
    println!("🧠 Classifier model: {}", config.classifier.model);
    println!("📊 Symbol universe: {}", config.classifier.symbol_universe);
    println!("⏱️  Poll Interval: {} seconds", config.agent.poll_interval_secs);
    println!();
    println!("Press Ctrl+C to stop");
    println!("═══════════════════════════════════════════════════════════");
    println!();
}
