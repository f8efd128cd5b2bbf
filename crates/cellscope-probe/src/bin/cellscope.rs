//! # cellscope
//!
//! Samples a cellular modem over its AT port at a fixed interval and logs
//! one normalized record per cycle.
//!
//! ## Usage
//!
//! ```bash
//! # CSV into ./network_data every 5 s
//! cellscope /dev/ttyUSB2
//!
//! # Faster cadence, JSON lines, no console summary
//! cellscope /dev/ttyUSB2 -i 1 --format jsonl --no-summary
//!
//! # Everything from a file, port from the environment
//! CELLSCOPE_PORT=/dev/ttyUSB2 cellscope --config cellscope.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cellscope_probe::config::{
    OutputConfigInput, SamplerConfigInput, SamplingConfigInput, SerialConfigInput,
};
use cellscope_probe::{OutputFormat, Sampler, SerialChannel, Summary, open_sink};

/// Granularity of the inter-cycle sleep; bounds shutdown latency.
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Cellular modem network sampler.
#[derive(Parser, Debug)]
#[command(name = "cellscope", version, about = "Cellular modem network sampler")]
struct Cli {
    /// Serial port of the modem's AT interface (e.g. /dev/ttyUSB2).
    #[arg(env = "CELLSCOPE_PORT")]
    port: Option<String>,

    /// Serial baud rate.
    #[arg(short, long)]
    baudrate: Option<u32>,

    /// Seconds between sampling cycles.
    #[arg(short, long)]
    interval: Option<f64>,

    /// Output directory for record files.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: csv or jsonl.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Do not print the per-cycle console summary.
    #[arg(long, default_value_t = false)]
    no_summary: bool,

    /// TOML configuration file; command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG).
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn as_config_input(&self) -> SamplerConfigInput {
        SamplerConfigInput {
            serial: SerialConfigInput {
                port: self.port.clone(),
                baudrate: self.baudrate,
                timeout_ms: None,
            },
            sampling: SamplingConfigInput {
                interval_s: self.interval,
                summary: self.no_summary.then_some(false),
            },
            output: OutputConfigInput {
                dir: self.output.clone(),
                format: self.format,
            },
        }
    }
}

fn main() {
    if let Err(e) = run() {
        tracing::error!(error = %format!("{e:#}"), "cellscope failed");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Logging ─────────────────────────────────────────────────
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(true)
        .compact()
        .init();

    // ── Configuration ───────────────────────────────────────────
    let file_input = match &cli.config {
        Some(path) => SamplerConfigInput::load(path).map_err(anyhow::Error::msg)?,
        None => SamplerConfigInput::default(),
    };
    let config = file_input
        .merge(cli.as_config_input())
        .resolve()
        .map_err(anyhow::Error::msg)?;

    tracing::info!(
        port = %config.port,
        baudrate = config.baudrate,
        interval_s = config.interval.as_secs_f64(),
        output = %config.output_dir.display(),
        format = %config.format,
        "cellscope starting"
    );

    // ── Graceful shutdown ───────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            tracing::info!("shutting down...");
            running.store(false, Ordering::SeqCst);
        })
        .context("failed to install signal handler")?;
    }

    // ── Modem ───────────────────────────────────────────────────
    let mut channel = SerialChannel::open(&config.port, config.baudrate)?;
    channel.verify(config.timeout)?;

    // ── Output sink ─────────────────────────────────────────────
    let mut sink = open_sink(&config.output_dir, config.format)
        .with_context(|| format!("cannot open output in {}", config.output_dir.display()))?;

    let mut sampler = Sampler::new(channel)
        .with_timeout(config.timeout)
        .with_shutdown(running.clone());
    sampler.configure_modem();

    // ── Sampling loop ───────────────────────────────────────────
    while running.load(Ordering::SeqCst) {
        let Some(record) = sampler.sample() else {
            break;
        };

        if let Err(e) = sink.append(&record) {
            tracing::error!(error = %e, "failed to write record");
        }
        if config.summary {
            println!("{}", Summary(&record));
        }

        sleep_while_running(&running, config.interval);
    }

    // ── Cleanup ─────────────────────────────────────────────────
    if let Err(e) = sink.close() {
        tracing::error!(error = %e, "failed to close output");
    }
    let cycles = sampler.cycles();
    drop(sampler);
    tracing::info!(cycles, "cellscope stopped");

    Ok(())
}

/// Sleep for `total`, waking every [`SLEEP_SLICE`] to check `running`.
/// An interval past the clock's range sleeps until shutdown.
fn sleep_while_running(running: &AtomicBool, total: Duration) {
    let deadline = Instant::now().checked_add(total);
    while running.load(Ordering::SeqCst) {
        let slice = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break;
                }
                remaining.min(SLEEP_SLICE)
            }
            None => SLEEP_SLICE,
        };
        std::thread::sleep(slice);
    }
}
