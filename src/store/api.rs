use anyhow::Result;
use async_trait::async_trait;

use super::types::{DecisionFields, DecisionRecord, OrderFields, OrderRecord};

/// Persistence seam shared by both pipelines. The store is the only channel
/// between the analyzer and trader processes; the Processed and Closed flags
/// are the sole coordination primitive.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Equality lookup on the decision table's URL column (the dedup key).
    async fn find_decisions_by_url(&self, url: &str) -> Result<Vec<DecisionRecord>>;

    /// Insert one decision record; returns the stored record with its id.
    async fn insert_decision(&self, fields: &DecisionFields) -> Result<DecisionRecord>;

    /// All decision records with Processed = false.
    async fn pending_decisions(&self) -> Result<Vec<DecisionRecord>>;

    /// Flip a decision record's Processed flag to true.
    async fn mark_decision_processed(&self, record_id: &str) -> Result<()>;

    /// Insert one order record; returns the stored record with its id.
    async fn insert_order(&self, fields: &OrderFields) -> Result<OrderRecord>;

    /// All order records with Closed = false.
    async fn open_orders(&self) -> Result<Vec<OrderRecord>>;

    /// Flip an order record's Closed flag to true.
    async fn mark_order_closed(&self, record_id: &str) -> Result<()>;
}
