pub mod airtable;
pub mod api;
pub mod types;

pub use airtable::AirtableStore;
pub use api::RecordStore;
pub use types::{
    DecisionFields, DecisionLabel, DecisionRecord, DecisionState, OrderFields, OrderRecord,
    PositionState, Record,
};
