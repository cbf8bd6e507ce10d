use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::broker::{Brokerage, MarketOrder, OrderSide};
use crate::config::Config;
use crate::positions::PositionCloser;
use crate::scheduler;
use crate::store::{DecisionRecord, OrderFields, RecordStore};

/// Map a normalized decision label onto an order side. Labels outside the
/// actionable set (hold and anything unrecognized) produce no order.
pub fn actionable_side(label: &str) -> Option<OrderSide> {
    match label {
        "buy" | "strong buy" => Some(OrderSide::Buy),
        "sell" | "strong sell" => Some(OrderSide::Sell),
        _ => None,
    }
}

/// Execution pipeline: drain unprocessed decision records into brokerage
/// orders, one fixed-notional market order per actionable decision.
///
/// Coordination with the analyzer happens only through the store's Processed
/// flag. The read of a pending record and the later flag write are not
/// atomic, so two trader processes can double-order; accepted limitation.
pub struct Trader {
    store: Arc<dyn RecordStore>,
    broker: Arc<dyn Brokerage>,
    closer: PositionCloser,
    notional: f64,
    poll_interval: Duration,
}

impl Trader {
    pub fn new(config: &Config, store: Arc<dyn RecordStore>, broker: Arc<dyn Brokerage>) -> Self {
        let closer = PositionCloser::new(
            store.clone(),
            broker.clone(),
            config.agent.max_position_age_hours,
        );
        Self {
            store,
            broker,
            closer,
            notional: config.agent.notional_usd,
            poll_interval: Duration::from_secs(config.agent.poll_interval_secs),
        }
    }

    /// Run the execution loop forever, one pass per poll interval.
    pub async fn run(&self) -> Result<()> {
        info!("💱 Starting the trading loop");
        scheduler::run_on_interval(self.poll_interval, || self.run_pass()).await;
        Ok(())
    }

    /// One full pass: close aged positions, then act on pending decisions.
    pub async fn run_pass(&self) -> Result<()> {
        self.closer.close_aged_positions().await;

        let pending = self.store.pending_decisions().await?;
        if pending.is_empty() {
            info!("No unprocessed records found.");
            return Ok(());
        }

        for record in pending {
            if let Err(e) = self.process_decision(&record).await {
                error!("Error processing decision {}: {:#}", record.id, e);
            }
        }

        Ok(())
    }

    async fn process_decision(&self, record: &DecisionRecord) -> Result<()> {
        let fields = &record.fields;

        // Missing symbol or label: nothing to act on, flag stays untouched.
        let Some(symbol) = fields.symbol.as_deref().filter(|s| !s.is_empty()) else {
            return Ok(());
        };
        let Some(label) = fields.decision.as_ref().and_then(|d| d.normalized()) else {
            return Ok(());
        };
        let Some(side) = actionable_side(&label) else {
            return Ok(());
        };

        info!("Processing decision {} for {}.", label, symbol);

        // Order placement is not gated on market hours; a closed market shows
        // up as a permanent rejection below.
        let order = MarketOrder {
            symbol: symbol.to_string(),
            side,
            notional: self.notional,
        };
        match self.broker.submit_order(&order).await {
            Ok(order_id) => {
                let order_fields = OrderFields {
                    symbol: symbol.to_string(),
                    order_size: self.notional,
                    summary: fields.summary.clone().unwrap_or_default(),
                    order_type: side.record_label().to_string(),
                    order_id,
                    closed: false,
                    last_modified: None,
                };
                self.store.insert_order(&order_fields).await?;
                self.store.mark_decision_processed(&record.id).await?;
                info!(
                    "{} {} for ${:.0}",
                    match side {
                        OrderSide::Buy => "Bought",
                        OrderSide::Sell => "Sold",
                    },
                    symbol,
                    self.notional
                );
            }
            Err(err) => {
                error!("Failed to {} {}: {}", side.record_label(), symbol, err);
                if err.is_permanent() {
                    self.store.mark_decision_processed(&record.id).await?;
                    info!("Marked {} as processed", symbol);
                }
            }
        }

        Ok(())
    }
}
