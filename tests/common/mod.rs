//! In-memory doubles for the store and brokerage seams.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use newsflow_agent::broker::{Brokerage, ClosePosition, MarketOrder, OrderError};
use newsflow_agent::store::{
    DecisionFields, DecisionRecord, OrderFields, OrderRecord, Record, RecordStore,
};

#[derive(Default)]
pub struct InMemoryStore {
    pub decisions: Mutex<Vec<DecisionRecord>>,
    pub orders: Mutex<Vec<OrderRecord>>,
    next_id: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    pub fn seed_decision(&self, fields: DecisionFields) -> String {
        let id = self.fresh_id("dec");
        self.decisions.lock().unwrap().push(Record {
            id: id.clone(),
            fields,
        });
        id
    }

    pub fn seed_order(&self, fields: OrderFields) -> String {
        let id = self.fresh_id("ord");
        self.orders.lock().unwrap().push(Record {
            id: id.clone(),
            fields,
        });
        id
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn find_decisions_by_url(&self, url: &str) -> Result<Vec<DecisionRecord>> {
        Ok(self
            .decisions
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.fields.url == url)
            .cloned()
            .collect())
    }

    async fn insert_decision(&self, fields: &DecisionFields) -> Result<DecisionRecord> {
        let record = Record {
            id: self.fresh_id("dec"),
            fields: fields.clone(),
        };
        self.decisions.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn pending_decisions(&self) -> Result<Vec<DecisionRecord>> {
        Ok(self
            .decisions
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !r.fields.processed)
            .cloned()
            .collect())
    }

    async fn mark_decision_processed(&self, record_id: &str) -> Result<()> {
        let mut decisions = self.decisions.lock().unwrap();
        let record = decisions
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| anyhow::anyhow!("no decision {}", record_id))?;
        record.fields.processed = true;
        Ok(())
    }

    async fn insert_order(&self, fields: &OrderFields) -> Result<OrderRecord> {
        let record = Record {
            id: self.fresh_id("ord"),
            fields: fields.clone(),
        };
        self.orders.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn open_orders(&self) -> Result<Vec<OrderRecord>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !r.fields.closed)
            .cloned()
            .collect())
    }

    async fn mark_order_closed(&self, record_id: &str) -> Result<()> {
        let mut orders = self.orders.lock().unwrap();
        let record = orders
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| anyhow::anyhow!("no order {}", record_id))?;
        record.fields.closed = true;
        Ok(())
    }
}

/// Scripted brokerage outcome for one submit call.
pub enum SubmitScript {
    Accept(String),
    Reject { code: Option<i64>, message: String },
    Fail(String),
}

pub struct FakeBroker {
    pub market_open: bool,
    pub submit_script: Mutex<VecDeque<SubmitScript>>,
    pub submitted: Mutex<Vec<MarketOrder>>,
    pub close_result: ClosePosition,
    pub closed_symbols: Mutex<Vec<String>>,
}

impl FakeBroker {
    pub fn new(market_open: bool) -> Self {
        Self {
            market_open,
            submit_script: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
            close_result: ClosePosition::Closed,
            closed_symbols: Mutex::new(Vec::new()),
        }
    }

    pub fn script(self, outcomes: Vec<SubmitScript>) -> Self {
        *self.submit_script.lock().unwrap() = outcomes.into();
        self
    }

    pub fn with_close_result(mut self, result: ClosePosition) -> Self {
        self.close_result = result;
        self
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl Brokerage for FakeBroker {
    async fn is_market_open(&self) -> Result<bool> {
        Ok(self.market_open)
    }

    async fn submit_order(&self, order: &MarketOrder) -> Result<String, OrderError> {
        self.submitted.lock().unwrap().push(order.clone());
        match self.submit_script.lock().unwrap().pop_front() {
            Some(SubmitScript::Accept(id)) => Ok(id),
            Some(SubmitScript::Reject { code, message }) => {
                Err(OrderError::Rejected { code, message })
            }
            Some(SubmitScript::Fail(msg)) => Err(OrderError::Transport(msg)),
            None => Ok("fake-order".to_string()),
        }
    }

    async fn close_position(&self, symbol: &str) -> Result<ClosePosition> {
        self.closed_symbols.lock().unwrap().push(symbol.to_string());
        Ok(self.close_result)
    }
}
