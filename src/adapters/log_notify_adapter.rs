//! Notification adapter that writes messages to the log.

use crate::domain::error::SigtraderError;
use crate::ports::notify_port::NotifyPort;
use tracing::info;

#[derive(Debug, Default)]
pub struct LogNotifyAdapter;

impl LogNotifyAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl NotifyPort for LogNotifyAdapter {
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), SigtraderError> {
        info!(subject, recipient, body, "notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_notify_never_fails() {
        let adapter = LogNotifyAdapter::new();
        assert!(adapter.send("New Trading Signal", "New signal: Buy", "").is_ok());
    }
}
