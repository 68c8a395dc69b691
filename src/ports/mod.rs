//! Port traits for the collaborators around the signal core.

pub mod chart_port;
pub mod config_port;
pub mod data_port;
pub mod notify_port;
pub mod novelty_port;
