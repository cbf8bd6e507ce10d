pub mod alpaca;
pub mod api;
pub mod types;

pub use alpaca::AlpacaClient;
pub use api::Brokerage;
pub use types::{ClosePosition, MarketOrder, OrderError, OrderSide};
