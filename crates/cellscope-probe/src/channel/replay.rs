//! Scripted channel that answers from canned responses.
//!
//! Used for offline decoding and tests: each command maps to a fixed list
//! of response lines, unknown commands get an empty response (the same
//! thing a timed-out or faulted serial command yields).

use std::collections::HashMap;
use std::time::Duration;

use super::CommandChannel;

#[derive(Debug, Default, Clone)]
pub struct ReplayChannel {
    responses: HashMap<String, Vec<String>>,
    sent: Vec<String>,
}

impl ReplayChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the lines returned for `command`.
    pub fn respond<I, S>(mut self, command: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses
            .insert(command.to_string(), lines.into_iter().map(Into::into).collect());
        self
    }

    /// Commands received so far, in order.
    pub fn sent(&self) -> &[String] {
        &self.sent
    }
}

impl CommandChannel for ReplayChannel {
    fn execute(&mut self, command: &str, _timeout: Duration) -> Vec<String> {
        self.sent.push(command.to_string());
        self.responses.get(command).cloned().unwrap_or_default()
    }
}
