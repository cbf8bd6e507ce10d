use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::config::ClassifierConfig;

const SYSTEM_PROMPT: &str = "Based on the news article, provide json with a trading 'decision' \
(strong buy, buy, strong sell, sell, or hold), symbol (maximum 1 related symbols from list, \
return nothing with hold decision if doesn't work with any of the stocks) and a brief \
'explanation'. Return it all in json format. RETURN NOTHING ELSE!";

/// Structured verdict extracted from the model's completion.
#[derive(Debug, Clone, Deserialize)]
pub struct Classification {
    pub decision: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Classification collaborator. Takes the summary plus article metadata and
/// returns a decision label, at most one symbol, and an explanation.
pub struct Classifier {
    http_client: Client,
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    pub async fn classify(
        &self,
        summary: &str,
        title: &str,
        description: &str,
    ) -> Result<Classification> {
        debug!("Classifying article: {}", title);

        let prompt = format!(
            "\n\nPerplexity object: {}\n\nTitle: {}\nDescription: {}\nSymbols list: {}",
            summary, title, description, self.config.symbol_universe
        );

        // The assistant turn is prefilled with "{" so the model completes the
        // JSON object; the reply must be re-prefixed before parsing.
        let body = json!({
            "model": self.config.model,
            "system": SYSTEM_PROMPT,
            "messages": [
                {
                    "role": "user",
                    "content": [{ "type": "text", "text": prompt }]
                },
                {
                    "role": "assistant",
                    "content": [{ "type": "text", "text": "{" }]
                }
            ],
            "max_tokens": self.config.max_tokens
        });

        let resp = self
            .http_client
            .post(format!("{}/v1/messages", self.config.host))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("Classifier API returned status {}", resp.status());
        }

        let json: serde_json::Value = resp.json().await?;
        let text = json["content"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Classifier response missing content"))?;

        Self::parse_completion(text)
    }

    /// Parse the model's completion, restoring the "{" the prefill consumed.
    pub fn parse_completion(text: &str) -> Result<Classification> {
        let raw = format!("{{{}", text);
        serde_json::from_str(&raw).with_context(|| format!("Unparseable classification: {}", raw))
    }
}
