//! E-mail notification through a local `sendmail` binary.
//!
//! The message is handed to `sendmail -t -i` on stdin; recipients are taken
//! from the headers.

use crate::domain::error::SigtraderError;
use crate::ports::notify_port::NotifyPort;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

pub struct SendmailAdapter {
    program: PathBuf,
    sender: Option<String>,
}

impl SendmailAdapter {
    pub fn new(program: impl Into<PathBuf>, sender: Option<String>) -> Self {
        Self {
            program: program.into(),
            sender,
        }
    }

    /// RFC 5322 message text with CRLF line endings.
    pub fn format_message(&self, subject: &str, body: &str, recipient: &str) -> String {
        let mut msg = String::new();
        if let Some(sender) = &self.sender {
            msg.push_str(&format!("From: {}\r\n", sender));
        }
        msg.push_str(&format!("To: {}\r\n", recipient));
        msg.push_str(&format!("Subject: {}\r\n", subject));
        msg.push_str("Content-Type: text/plain; charset=utf-8\r\n");
        msg.push_str("\r\n");
        for line in body.lines() {
            msg.push_str(line);
            msg.push_str("\r\n");
        }
        msg
    }
}

impl NotifyPort for SendmailAdapter {
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), SigtraderError> {
        let message = self.format_message(subject, body, recipient);

        let mut child = Command::new(&self.program)
            .args(["-t", "-i"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SigtraderError::Notify {
                reason: format!("failed to start {}: {}", self.program.display(), e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(message.as_bytes()) {
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(SigtraderError::Notify {
                    reason: format!("failed to write message: {}", e),
                });
            }
        }

        let output = child.wait_with_output().map_err(|e| SigtraderError::Notify {
            reason: format!("sendmail did not finish: {}", e),
        })?;
        if !output.status.success() {
            return Err(SigtraderError::Notify {
                reason: format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        debug!(recipient, "notification handed to sendmail");
        Ok(())
    }
}
