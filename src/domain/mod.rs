//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod daily;
pub mod budget;
pub mod portfolio;
pub mod strategy;
pub mod lexicon;
pub mod sentiment;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
