//! Notification sink port trait.

use crate::domain::error::SigtraderError;

pub trait NotifyPort {
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), SigtraderError>;
}
