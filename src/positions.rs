use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::broker::Brokerage;
use crate::store::RecordStore;

/// Closes any open position whose order record has aged past the threshold.
/// Runs once per trader tick, before order processing, and only while the
/// market is open.
pub struct PositionCloser {
    store: Arc<dyn RecordStore>,
    broker: Arc<dyn Brokerage>,
    max_age: Duration,
}

impl PositionCloser {
    pub fn new(store: Arc<dyn RecordStore>, broker: Arc<dyn Brokerage>, max_age_hours: i64) -> Self {
        Self {
            store,
            broker,
            max_age: Duration::hours(max_age_hours),
        }
    }

    /// Whether a position last touched at `modified` is due for closure.
    pub fn is_aged(&self, now: DateTime<Utc>, modified: DateTime<Utc>) -> bool {
        now - modified >= self.max_age
    }

    /// One closing pass. Never fails the surrounding tick; every failure is
    /// logged and the record retried next time.
    pub async fn close_aged_positions(&self) {
        match self.broker.is_market_open().await {
            Ok(true) => {}
            Ok(false) => {
                info!("Market is closed. Skipping position check and closure.");
                return;
            }
            Err(e) => {
                error!("Failed to check market status: {:#}", e);
                return;
            }
        }

        let records = match self.store.open_orders().await {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to fetch open positions: {:#}", e);
                return;
            }
        };

        let now = Utc::now();
        for record in records {
            let symbol = record.fields.symbol.clone();

            let Some(modified) = record.fields.last_modified else {
                warn!("Position for {} has no creation time. Skipping.", symbol);
                continue;
            };

            if !self.is_aged(now, modified) {
                continue;
            }

            // Not-found from the brokerage means the position is already
            // flat; both outcomes end with the record marked closed.
            match self.broker.close_position(&symbol).await {
                Ok(_) => {
                    if let Err(e) = self.store.mark_order_closed(&record.id).await {
                        error!("Failed to mark {} closed: {:#}", symbol, e);
                    } else {
                        info!("Closed position for {}", symbol);
                    }
                }
                Err(e) => {
                    error!("Failed to close position for {}: {:#}", symbol, e);
                }
            }
        }
    }
}
