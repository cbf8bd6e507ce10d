use anyhow::Result;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::config::SummarizerConfig;

/// Online research collaborator. Given an article URL it returns a free-text
/// summary suitable as trading context.
pub struct Summarizer {
    http_client: Client,
    config: SummarizerConfig,
}

impl Summarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    pub async fn summarize(&self, url: &str) -> Result<String> {
        debug!("Requesting summary for {}", url);

        let body = json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "user",
                    "content": format!(
                        "url: {}\nCreate a summary on which I could base my trades on.",
                        url
                    )
                }
            ],
            "max_tokens": self.config.max_tokens
        });

        let resp = self
            .http_client
            .post(format!("{}/chat/completions", self.config.host))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("Summarizer API returned status {}", resp.status());
        }

        let json: serde_json::Value = resp.json().await?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Summarizer response missing content"))?
            .to_string();

        Ok(content)
    }
}
