//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod csv_novelty_store;
pub mod file_config_adapter;
pub mod log_notify_adapter;
pub mod memory_novelty_store;
pub mod sendmail_adapter;
pub mod signal_export;
pub mod svg_chart_adapter;
