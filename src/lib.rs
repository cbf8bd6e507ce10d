pub mod analysis;
pub mod analyzer;
pub mod broker;
pub mod config;
pub mod feed;
pub mod positions;
pub mod scheduler;
pub mod store;
pub mod trader;
