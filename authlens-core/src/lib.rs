mod analyzer;
pub mod db;
pub mod risk;
mod store;
pub mod view;

pub use analyzer::{Analyzer, SecurityInsights};
pub use store::RecordStore;
