//! # Command Channel
//!
//! Request/response text protocol to the modem. A command is sent as one
//! line and the reply is collected line by line until a terminator (`OK`,
//! `ERROR`, `+CME ERROR: <n>`) or until the per-command timeout.
//!
//! [`CommandChannel::execute`] never fails: a transport fault is logged and
//! reported as an empty response, which every decoder treats as "no data".

pub mod replay;
pub mod serial;

use std::time::Duration;

use thiserror::Error;

pub use replay::ReplayChannel;
pub use serial::SerialChannel;

/// Read timeout used when the caller has no better value.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while opening or talking to a serial modem.
///
/// Only [`SerialChannel::open`] and [`SerialChannel::verify`] surface these;
/// per-command faults are absorbed inside `execute`.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("modem on {port} did not answer AT with OK")]
    NotResponding { port: String },
}

/// Line-oriented command/response channel to a modem.
pub trait CommandChannel {
    /// Send `command` and collect response lines until a terminator or
    /// `timeout`. Returns an empty vector on any transport fault.
    fn execute(&mut self, command: &str, timeout: Duration) -> Vec<String>;
}

impl<C: CommandChannel + ?Sized> CommandChannel for &mut C {
    fn execute(&mut self, command: &str, timeout: Duration) -> Vec<String> {
        (**self).execute(command, timeout)
    }
}

impl<C: CommandChannel + ?Sized> CommandChannel for Box<C> {
    fn execute(&mut self, command: &str, timeout: Duration) -> Vec<String> {
        (**self).execute(command, timeout)
    }
}

/// Whether `line` ends a response.
pub fn is_terminator(line: &str) -> bool {
    line == "OK" || line == "ERROR" || line.starts_with("+CME ERROR")
}

/// Whether any response line carries `OK`.
pub fn contains_ok(lines: &[String]) -> bool {
    lines.iter().any(|line| line.contains("OK"))
}

/// Splits a byte stream into trimmed, non-empty text lines.
///
/// Bytes are decoded lossily; a fragment without a trailing newline is held
/// until more bytes arrive or [`LineBuffer::finish`] is called.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every line completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            if let Some(line) = decode_line(&raw) {
                lines.push(line);
            }
        }
        lines
    }

    /// Flush a trailing fragment, if any.
    pub fn finish(&mut self) -> Option<String> {
        let raw = std::mem::take(&mut self.pending);
        decode_line(&raw)
    }
}

fn decode_line(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let line = text.trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}
