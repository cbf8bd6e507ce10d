use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a decision record. Pending until the trader either places an
/// order for it or gives up on it permanently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionState {
    Pending,
    Processed,
}

impl DecisionState {
    pub fn from_flag(processed: bool) -> Self {
        if processed {
            Self::Processed
        } else {
            Self::Pending
        }
    }

    /// Pending -> Processed. Idempotent; a processed decision stays processed.
    pub fn process(self) -> Self {
        Self::Processed
    }
}

/// Lifecycle of an order record's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Open,
    Closed,
}

impl PositionState {
    pub fn from_flag(closed: bool) -> Self {
        if closed {
            Self::Closed
        } else {
            Self::Open
        }
    }

    /// Open -> Closed. Idempotent; closing a closed position is a no-op.
    pub fn close(self) -> Self {
        Self::Closed
    }
}

/// A persisted record: external row id plus typed fields.
#[derive(Debug, Clone, Deserialize)]
pub struct Record<T> {
    pub id: String,
    pub fields: T,
}

pub type DecisionRecord = Record<DecisionFields>;
pub type OrderRecord = Record<OrderFields>;

/// The decision label as the store delivers it: multi-select columns come
/// back as a single-element array, plain text columns as a bare string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecisionLabel {
    One(String),
    Many(Vec<String>),
}

impl DecisionLabel {
    /// Lower-cased label, unwrapping a single-element collection.
    pub fn normalized(&self) -> Option<String> {
        match self {
            DecisionLabel::One(s) => Some(s.to_lowercase()),
            DecisionLabel::Many(v) => v.first().map(|s| s.to_lowercase()),
        }
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Columns of the news (decision) table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionFields {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Decision", default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<DecisionLabel>,
    #[serde(rename = "Symbol", default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(rename = "Summary", default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(rename = "Perplexity", default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    // Checkbox column: absent means false, so it is never serialized when false.
    #[serde(rename = "Processed", default, skip_serializing_if = "is_false")]
    pub processed: bool,
}

impl DecisionFields {
    pub fn state(&self) -> DecisionState {
        DecisionState::from_flag(self.processed)
    }
}

/// Columns of the orders table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFields {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Order size")]
    pub order_size: f64,
    #[serde(rename = "Summary", default)]
    pub summary: String,
    #[serde(rename = "Type")]
    pub order_type: String,
    #[serde(rename = "Order ID")]
    pub order_id: String,
    #[serde(rename = "Closed", default, skip_serializing_if = "is_false")]
    pub closed: bool,
    // Computed column, read-only on our side.
    #[serde(rename = "Last Modified", default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl OrderFields {
    pub fn state(&self) -> PositionState {
        PositionState::from_flag(self.closed)
    }

    /// Age of the position, measured from the record's last-modified time.
    /// None when the store never reported a timestamp.
    pub fn age(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.last_modified.map(|t| now - t)
    }
}
