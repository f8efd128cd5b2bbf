//! Sampler configuration.
//!
//! The TOML file and the command line both produce a [`SamplerConfigInput`]
//! where every value is optional. Inputs are layered with
//! [`SamplerConfigInput::merge`] and then resolved into a validated
//! [`SamplerConfig`] with defaults filled in.
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyUSB2"
//! baudrate = 115200
//! timeout_ms = 5000
//!
//! [sampling]
//! interval_s = 5.0
//! summary = true
//!
//! [output]
//! dir = "network_data"
//! format = "csv"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::sink::OutputFormat;

pub const DEFAULT_BAUDRATE: u32 = 115_200;
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_INTERVAL_S: f64 = 5.0;
pub const DEFAULT_OUTPUT_DIR: &str = "network_data";

const MIN_TIMEOUT_MS: u64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SamplerConfigInput {
    pub serial: SerialConfigInput,
    pub sampling: SamplingConfigInput,
    pub output: OutputConfigInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SerialConfigInput {
    pub port: Option<String>,
    pub baudrate: Option<u32>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SamplingConfigInput {
    pub interval_s: Option<f64>,
    pub summary: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfigInput {
    pub dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    pub port: String,
    pub baudrate: u32,
    pub timeout: Duration,
    pub interval: Duration,
    pub summary: bool,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
}

impl SamplerConfigInput {
    /// Overlay `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: SamplerConfigInput) -> SamplerConfigInput {
        SamplerConfigInput {
            serial: SerialConfigInput {
                port: other.serial.port.or(self.serial.port),
                baudrate: other.serial.baudrate.or(self.serial.baudrate),
                timeout_ms: other.serial.timeout_ms.or(self.serial.timeout_ms),
            },
            sampling: SamplingConfigInput {
                interval_s: other.sampling.interval_s.or(self.sampling.interval_s),
                summary: other.sampling.summary.or(self.sampling.summary),
            },
            output: OutputConfigInput {
                dir: other.output.dir.or(self.output.dir),
                format: other.output.format.or(self.output.format),
            },
        }
    }

    pub fn resolve(self) -> Result<SamplerConfig, String> {
        let port = self
            .serial
            .port
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                "no serial port given (use PORT, CELLSCOPE_PORT or [serial] port)".to_string()
            })?;

        let baudrate = self.serial.baudrate.unwrap_or(DEFAULT_BAUDRATE);
        if baudrate == 0 {
            return Err("baudrate must be > 0".into());
        }

        let timeout_ms = self
            .serial
            .timeout_ms
            .unwrap_or(DEFAULT_TIMEOUT_MS)
            .max(MIN_TIMEOUT_MS);

        // Rejects negative, non-finite and out-of-range values.
        let interval_s = self.sampling.interval_s.unwrap_or(DEFAULT_INTERVAL_S);
        let interval = Duration::try_from_secs_f64(interval_s)
            .map_err(|e| format!("invalid interval {interval_s}: {e}"))?;

        Ok(SamplerConfig {
            port,
            baudrate,
            timeout: Duration::from_millis(timeout_ms),
            interval,
            summary: self.sampling.summary.unwrap_or(true),
            output_dir: self
                .output
                .dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            format: self.output.format.unwrap_or_default(),
        })
    }

    pub fn from_toml_str(input: &str) -> Result<Self, String> {
        if input.trim().is_empty() {
            return Ok(SamplerConfigInput::default());
        }
        toml::from_str(input).map_err(|e| format!("Invalid config TOML: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?;
        Self::from_toml_str(&text)
    }
}
