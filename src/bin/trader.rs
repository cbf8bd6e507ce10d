use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsflow_agent::broker::AlpacaClient;
use newsflow_agent::config::Config;
use newsflow_agent::store::AirtableStore;
use newsflow_agent::trader::Trader;

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
    let broker = Arc::new(AlpacaClient::new(&config.broker));
    let trader = Trader::new(&config, store, broker);

    trader.run().await
}

fn print_banner(config: &Config) {
    println!("\n╔═══════════════════════════════════════════════════════════╗");
    println!("║              Newsflow Agent — Order Trader                ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();
    println!(
        "📊 Mode: {}",
        if config.broker.paper_trading {
            "PAPER TRADING (Safe Mode)"
        } else {
            "⚠️  LIVE TRADING ⚠️"
        }
    );
    println!("💵 Notional per order: ${:.0}", config.agent.notional_usd);
    println!(
        "🕒 Max position age: {} hours",
        config.agent.max_position_age_hours
    );
    println!("⏱️  Poll Interval: {} seconds", config.agent.poll_interval_secs);
    println!();
    println!("Press Ctrl+C to stop");
    println!("═══════════════════════════════════════════════════════════");
    println!();
}
