//! # Record Assembler
//!
//! Drives one sampling cycle: issue every query in a fixed order, decode
//! each response and merge the partial updates into a fresh record.
//!
//! ```text
//! serving cell → CS → PS → EPS → 5GS → SIM/operator/attach → neighbors → CSQ/CA
//! ```
//!
//! The decoders are independent; the order only makes the command sequence
//! and log output deterministic.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use cellscope_common::{NormalizedRecord, RegistrationDomain};

use crate::channel::{CommandChannel, DEFAULT_TIMEOUT};
use crate::decode::{
    RecordPatch, auth, decode_auth, decode_neighbors, decode_registration, decode_serving_cell,
    decode_signal_metrics, metrics, neighbor, serving,
};

/// Record timestamp format, local time with milliseconds.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Samples a modem through a [`CommandChannel`], one record per call.
pub struct Sampler<C: CommandChannel> {
    channel: C,
    timeout: Duration,
    /// Cleared by the signal handler; checked before every query.
    running: Option<Arc<AtomicBool>>,
    cycles: u64,
}

impl<C: CommandChannel> Sampler<C> {
    pub fn new(channel: C) -> Self {
        Sampler {
            channel,
            timeout: DEFAULT_TIMEOUT,
            running: None,
            cycles: 0,
        }
    }

    /// Per-command read timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Abandon the in-flight cycle as soon as `running` is cleared.
    pub fn with_shutdown(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = Some(running);
        self
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Completed cycles so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// One-time modem setup: unsolicited registration reports with
    /// location info on every domain, plus the serving-cell report format.
    /// Responses are ignored.
    pub fn configure_modem(&mut self) {
        for domain in RegistrationDomain::ALL {
            self.channel.execute(domain.enable_urc(), self.timeout);
        }
        self.channel.execute(serving::FORMAT_COMMAND, self.timeout);
        tracing::info!("modem configured for monitoring");
    }

    /// Run one cycle stamped with the current local time.
    ///
    /// Returns `None` only when a shutdown flag is attached and was cleared
    /// mid-cycle; the partial record is discarded.
    pub fn sample(&mut self) -> Option<NormalizedRecord> {
        self.sample_at(timestamp_now())
    }

    /// Run one cycle with an explicit timestamp.
    pub fn sample_at(&mut self, timestamp: String) -> Option<NormalizedRecord> {
        let mut record = NormalizedRecord::stamped(timestamp);

        let lines = self.query(serving::QUERY)?;
        decode_serving_cell(&lines).apply(&mut record);

        for domain in RegistrationDomain::ALL {
            let lines = self.query(domain.query())?;
            decode_registration(domain, &lines).apply(&mut record);
        }

        let sim = self.query(auth::SIM_QUERY)?;
        let operator = self.query(auth::OPERATOR_QUERY)?;
        let attach = self.query(auth::ATTACH_QUERY)?;
        decode_auth(&sim, &operator, &attach).apply(&mut record);

        let lines = self.query(neighbor::QUERY)?;
        decode_neighbors(&lines).apply(&mut record);

        let csq = self.query(metrics::CSQ_QUERY)?;
        let ca = self.query(metrics::CA_QUERY)?;
        decode_signal_metrics(&csq, &ca).apply(&mut record);

        self.cycles += 1;
        tracing::debug!(
            cycle = self.cycles,
            technology = ?record.technology,
            rrc_state = %record.rrc_state,
            neighbors = record.neighbor_count,
            "cycle complete"
        );
        Some(record)
    }

    fn query(&mut self, command: &str) -> Option<Vec<String>> {
        if let Some(running) = &self.running {
            if !running.load(Ordering::SeqCst) {
                tracing::debug!(command, "shutdown requested, cycle abandoned");
                return None;
            }
        }
        Some(self.channel.execute(command, self.timeout))
    }
}
