use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub feed: FeedConfig,
    pub summarizer: SummarizerConfig,
    pub classifier: ClassifierConfig,
    pub airtable: AirtableConfig,
    pub broker: BrokerConfig,
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    pub url: String,
    pub max_entries: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummarizerConfig {
    pub api_key: String,
    pub host: String,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    pub api_key: String,
    pub host: String,
    pub model: String,
    pub max_tokens: u32,
    /// Instrument universe handed to the model, e.g. "NASDAQ and SP500".
    pub symbol_universe: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base_id: String,
    pub news_table: String,
    pub orders_table: String,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrokerConfig {
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
    pub paper_trading: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    pub poll_interval_secs: u64,
    pub notional_usd: f64,
    pub max_position_age_hours: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let feed = FeedConfig {
            url: env::var("RSS_URL").unwrap_or_default(),
            max_entries: env::var("FEED_MAX_ENTRIES")
                .unwrap_or_else(|_| "25".to_string())
                .parse()
                .unwrap_or(25),
        };

        let summarizer = SummarizerConfig {
            api_key: env::var("PERPLEXITY_API_KEY").unwrap_or_default(),
            host: env::var("PERPLEXITY_HOST")
                .unwrap_or_else(|_| "https://api.perplexity.ai".to_string()),
            model: env::var("PERPLEXITY_MODEL")
                .unwrap_or_else(|_| "llama-3.1-sonar-large-128k-online".to_string()),
            max_tokens: env::var("PERPLEXITY_MAX_TOKENS")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        let classifier = ClassifierConfig {
            api_key: env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            host: env::var("ANTHROPIC_HOST")
                .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
            model: env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| "claude-3-5-sonnet-20240620".to_string()),
            max_tokens: env::var("ANTHROPIC_MAX_TOKENS")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            symbol_universe: env::var("SYMBOL_UNIVERSE")
                .unwrap_or_else(|_| "NASDAQ and SP500".to_string()),
        };

        let airtable = AirtableConfig {
            api_key: env::var("AIRTABLE_API_KEY").unwrap_or_default(),
            base_id: env::var("AIRTABLE_BASE_ID").unwrap_or_default(),
            news_table: env::var("AIRTABLE_NEWS_TABLE").unwrap_or_default(),
            orders_table: env::var("AIRTABLE_ORDERS_TABLE").unwrap_or_default(),
            host: env::var("AIRTABLE_HOST")
                .unwrap_or_else(|_| "https://api.airtable.com".to_string()),
        };

        let broker = BrokerConfig {
            api_key: env::var("ALPACA_API_KEY").unwrap_or_default(),
            api_secret: env::var("ALPACA_API_SECRET").unwrap_or_default(),
            base_url: env::var("ALPACA_BASE_URL")
                .unwrap_or_else(|_| "https://paper-api.alpaca.markets".to_string()),
            paper_trading: env::var("PAPER_TRADING")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        };

        let agent = AgentConfig {
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            notional_usd: env::var("NOTIONAL_USD")
                .unwrap_or_else(|_| "10000.0".to_string())
                .parse()
                .unwrap_or(10000.0),
            max_position_age_hours: env::var("MAX_POSITION_AGE_HOURS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),
        };

        Ok(Config {
            feed,
            summarizer,
            classifier,
            airtable,
            broker,
            agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_env_missing() {
        // Only touch vars this test owns; the rest fall through to defaults.
        std::env::remove_var("POLL_INTERVAL_SECS");
        std::env::remove_var("NOTIONAL_USD");
        std::env::remove_var("MAX_POSITION_AGE_HOURS");

        let config = Config::from_env().unwrap();
        assert_eq!(config.agent.poll_interval_secs, 60);
        assert_eq!(config.agent.notional_usd, 10000.0);
        assert_eq!(config.agent.max_position_age_hours, 3);
        assert_eq!(config.feed.max_entries, 25);
        assert_eq!(config.classifier.symbol_universe, "NASDAQ and SP500");
    }
}
