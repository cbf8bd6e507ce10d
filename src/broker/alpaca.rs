use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::api::Brokerage;
use super::types::{ClosePosition, MarketOrder, OrderError};
use crate::config::BrokerConfig;

/// Alpaca trading API client.
pub struct AlpacaClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    paper_trading: bool,
}

#[derive(Debug, Deserialize)]
struct ClockResponse {
    is_open: bool,
}

/// Error body shape: numeric code and a message under either key.
#[derive(Debug, Deserialize)]
struct OrderErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl AlpacaClient {
    pub fn new(config: &BrokerConfig) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            paper_trading: config.paper_trading,
        }
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("APCA-API-KEY-ID", &self.api_key)
            .header("APCA-API-SECRET-KEY", &self.api_secret)
    }
}

#[async_trait]
impl Brokerage for AlpacaClient {
    async fn is_market_open(&self) -> Result<bool> {
        let resp = self
            .auth(self.http_client.get(format!("{}/v2/clock", self.base_url)))
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("Failed to check market status: {}", resp.status());
        }

        let clock: ClockResponse = resp.json().await?;
        Ok(clock.is_open)
    }

    async fn submit_order(&self, order: &MarketOrder) -> Result<String, OrderError> {
        if self.paper_trading {
            info!(
                "[PAPER] Order: {:?} {} notional ${:.2}",
                order.side, order.symbol, order.notional
            );
            return Ok(format!("paper-order-{}", uuid::Uuid::new_v4()));
        }

        let body = json!({
            "symbol": order.symbol,
            "side": order.side,
            "type": "market",
            "time_in_force": "day",
            "notional": order.notional
        });

        let resp = self
            .auth(self.http_client.post(format!("{}/v2/orders", self.base_url)))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| OrderError::Transport(e.to_string()))?;

        let status = resp.status();
        let payload: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| OrderError::Transport(e.to_string()))?;

        // Accepted orders carry an id regardless of exact 2xx status.
        if let Some(id) = payload.get("id").and_then(|v| v.as_str()) {
            debug!("Order accepted: {}", id);
            return Ok(id.to_string());
        }

        let err: OrderErrorBody = serde_json::from_value(payload.clone()).unwrap_or(OrderErrorBody {
            code: None,
            message: None,
            error: None,
        });
        Err(OrderError::Rejected {
            code: err.code,
            message: err
                .message
                .or(err.error)
                .unwrap_or_else(|| format!("status {}: {}", status, payload)),
        })
    }

    async fn close_position(&self, symbol: &str) -> Result<ClosePosition> {
        let resp = self
            .auth(
                self.http_client
                    .delete(format!("{}/v2/positions/{}", self.base_url, symbol)),
            )
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => {
                warn!("No open position for {}; treating as already flat", symbol);
                Ok(ClosePosition::AlreadyFlat)
            }
            s if s.is_success() => Ok(ClosePosition::Closed),
            s => anyhow::bail!("Failed to close position for {}: status {}", symbol, s),
        }
    }
}
