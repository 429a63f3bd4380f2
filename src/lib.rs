pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod notify;
pub mod report;
pub mod station;
pub mod store;

pub use error::{Error, Result};
pub use station::{Price, Snapshot, StationRecord};
