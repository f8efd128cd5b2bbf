//! Serial-port implementation of [`CommandChannel`].

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use serialport::{ClearBuffer, DataBits, Parity, SerialPort, StopBits};

use super::{ChannelError, CommandChannel, LineBuffer, contains_ok, is_terminator};

/// Granularity of a single blocking read. The overall command timeout is
/// enforced by a deadline on top of this.
const READ_POLL: Duration = Duration::from_millis(50);

/// AT command channel over a serial device (8N1).
pub struct SerialChannel {
    port: Box<dyn SerialPort>,
    name: String,
}

impl SerialChannel {
    /// Open `name` at `baudrate`, 8 data bits, no parity, one stop bit.
    pub fn open(name: &str, baudrate: u32) -> Result<Self, ChannelError> {
        let port = serialport::new(name, baudrate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(READ_POLL)
            .open()
            .map_err(|source| ChannelError::Open {
                port: name.to_string(),
                source,
            })?;

        tracing::info!(port = name, baudrate, "serial port opened");
        Ok(SerialChannel {
            port,
            name: name.to_string(),
        })
    }

    /// Send a bare `AT` and return whatever the modem answered.
    pub fn probe(&mut self, timeout: Duration) -> Result<Vec<String>, ChannelError> {
        self.try_execute("AT", timeout)
    }

    /// Check that the modem answers `AT` with `OK`.
    pub fn verify(&mut self, timeout: Duration) -> Result<(), ChannelError> {
        let lines = self.probe(timeout)?;
        if contains_ok(&lines) {
            tracing::info!(port = %self.name, "modem communication verified");
            Ok(())
        } else {
            Err(ChannelError::NotResponding {
                port: self.name.clone(),
            })
        }
    }

    fn try_execute(
        &mut self,
        command: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, ChannelError> {
        self.port.clear(ClearBuffer::All)?;
        self.port.write_all(format!("{command}\r\n").as_bytes())?;
        self.port.flush()?;
        tracing::debug!(command, "sent");

        let deadline = Instant::now() + timeout;
        let mut buffer = LineBuffer::new();
        let mut lines = Vec::new();
        let mut chunk = [0u8; 512];

        while Instant::now() < deadline {
            match self.port.read(&mut chunk) {
                Ok(0) => {}
                Ok(n) => {
                    for line in buffer.push(&chunk[..n]) {
                        let done = is_terminator(&line);
                        lines.push(line);
                        if done {
                            return Ok(lines);
                        }
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }

        lines.extend(buffer.finish());
        tracing::debug!(command, ?timeout, "no terminator before timeout");
        Ok(lines)
    }
}

impl CommandChannel for SerialChannel {
    fn execute(&mut self, command: &str, timeout: Duration) -> Vec<String> {
        match self.try_execute(command, timeout) {
            Ok(lines) => {
                tracing::debug!(command, response = ?lines, "response");
                lines
            }
            Err(e) => {
                tracing::warn!(port = %self.name, command, error = %e, "command failed");
                Vec::new()
            }
        }
    }
}

impl Drop for SerialChannel {
    fn drop(&mut self) {
        tracing::info!(port = %self.name, "disconnected from modem");
    }
}
