use anyhow::Result;
use async_trait::async_trait;

use super::types::{ClosePosition, MarketOrder, OrderError};

/// Brokerage seam: clock, order entry, position closure.
#[async_trait]
pub trait Brokerage: Send + Sync {
    /// Whether the market is currently open for trading.
    async fn is_market_open(&self) -> Result<bool>;

    /// Submit a market order; returns the brokerage's order id on acceptance.
    async fn submit_order(&self, order: &MarketOrder) -> Result<String, OrderError>;

    /// Close (flatten) the position for a symbol.
    async fn close_position(&self, symbol: &str) -> Result<ClosePosition>;
}
