//! Port traits for the collaborators the backtest core consumes.

pub mod config_port;
pub mod data_port;
pub mod news_port;
pub mod report_port;
