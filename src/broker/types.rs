use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Brokerage error codes that will never succeed on retry.
const PERMANENT_REJECTION_CODES: &[i64] = &[40310000, 42210000];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Label used in the orders table's Type column.
    pub fn record_label(&self) -> &'static str {
        match self {
            OrderSide::Buy => "Buy",
            OrderSide::Sell => "Sell",
        }
    }
}

/// A market order sized by notional dollars rather than share count.
#[derive(Debug, Clone)]
pub struct MarketOrder {
    pub symbol: String,
    pub side: OrderSide,
    pub notional: f64,
}

/// Outcome of asking the brokerage to flatten a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosePosition {
    Closed,
    /// The brokerage reported no such position; already flat.
    AlreadyFlat,
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order rejected (code {code:?}): {message}")]
    Rejected { code: Option<i64>, message: String },
    #[error("order transport failure: {0}")]
    Transport(String),
}

impl OrderError {
    /// True when retrying this order can never succeed: specific rejection
    /// codes, or the market-is-closed message. The trader marks the decision
    /// processed on these instead of retrying forever.
    pub fn is_permanent(&self) -> bool {
        match self {
            OrderError::Rejected { code, message } => {
                code.map_or(false, |c| PERMANENT_REJECTION_CODES.contains(&c))
                    || message.eq_ignore_ascii_case("market is closed")
            }
            OrderError::Transport(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_codes_are_permanent() {
        for code in [40310000, 42210000] {
            let err = OrderError::Rejected {
                code: Some(code),
                message: "rejected".into(),
            };
            assert!(err.is_permanent(), "code {} should be permanent", code);
        }
    }

    #[test]
    fn market_closed_message_is_permanent() {
        let err = OrderError::Rejected {
            code: None,
            message: "Market is closed".into(),
        };
        assert!(err.is_permanent());
    }

    #[test]
    fn other_rejections_are_retryable() {
        let err = OrderError::Rejected {
            code: Some(40010001),
            message: "insufficient buying power".into(),
        };
        assert!(!err.is_permanent());

        let err = OrderError::Transport("connection reset".into());
        assert!(!err.is_permanent());
    }

    #[test]
    fn side_record_labels() {
        assert_eq!(OrderSide::Buy.record_label(), "Buy");
        assert_eq!(OrderSide::Sell.record_label(), "Sell");
    }
}
