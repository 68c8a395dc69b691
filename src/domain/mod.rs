//! Core domain types and logic.

pub mod analysis;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod novelty;
pub mod ohlcv;
pub mod portfolio;
pub mod price_series;
pub mod signal;
pub mod signal_config;
