//! # cellscope-portscan
//!
//! Finds the modem's AT command port. USB modems expose several serial
//! interfaces (diagnostics, NMEA, AT, ...) and only one of them answers `AT`
//! with `OK`.
//!
//! ```bash
//! cellscope-portscan            # /dev/ttyUSB* only
//! cellscope-portscan --all      # every serial port the OS reports
//! ```

use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cellscope_probe::channel::contains_ok;
use cellscope_probe::config::DEFAULT_BAUDRATE;
use cellscope_probe::{ChannelError, SerialChannel};

const PORT_FILTER: &str = "ttyUSB";
const RULE: &str = "============================================================";

/// Probe serial ports for an AT command interface.
#[derive(Parser, Debug)]
#[command(name = "cellscope-portscan", version, about = "Find the modem AT command port")]
struct Cli {
    /// Probe every serial port, not just ttyUSB devices.
    #[arg(long, default_value_t = false)]
    all: bool,

    /// Serial baud rate.
    #[arg(short, long, default_value_t = DEFAULT_BAUDRATE)]
    baudrate: u32,

    /// Per-port response timeout in milliseconds.
    #[arg(long, default_value_t = 3000)]
    timeout_ms: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .compact()
        .init();

    let cli = Cli::parse();
    let timeout = Duration::from_millis(cli.timeout_ms);

    let mut ports: Vec<String> = serialport::available_ports()?
        .into_iter()
        .map(|p| p.port_name)
        .filter(|name| cli.all || name.contains(PORT_FILTER))
        .collect();
    ports.sort();

    let mut out = io::stdout().lock();

    if ports.is_empty() {
        if cli.all {
            writeln!(out, "No serial ports found!")?;
        } else {
            writeln!(out, "No {PORT_FILTER} ports found! (use --all to probe every port)")?;
        }
        return Ok(());
    }

    writeln!(out, "Testing AT command response on available ports:")?;
    writeln!(out, "{RULE}")?;

    let mut at_ports = Vec::new();
    for port in &ports {
        writeln!(out, "\nTesting {port}...")?;
        if report(port, probe(port, cli.baudrate, timeout), &mut out)? {
            at_ports.push(port.as_str());
        }
    }

    writeln!(out, "\n{RULE}")?;
    recommend(&at_ports, &mut out)?;

    Ok(())
}

fn probe(port: &str, baudrate: u32, timeout: Duration) -> Result<Vec<String>, ChannelError> {
    SerialChannel::open(port, baudrate)?.probe(timeout)
}

/// Print the outcome for one port. Returns whether it answered `OK`.
fn report(
    port: &str,
    result: Result<Vec<String>, ChannelError>,
    out: &mut impl Write,
) -> io::Result<bool> {
    match result {
        Ok(lines) if contains_ok(&lines) => {
            writeln!(out, "✓ {port}: AT command SUCCESSFUL")?;
            writeln!(out, "  Response: {}", lines.join(" "))?;
            Ok(true)
        }
        Ok(lines) if lines.is_empty() => {
            writeln!(out, "✗ {port}: Failed - no response")?;
            Ok(false)
        }
        Ok(lines) => {
            writeln!(out, "✗ {port}: Failed - {}", lines.join(" "))?;
            Ok(false)
        }
        Err(e) => {
            writeln!(out, "✗ {port}: Failed - {e}")?;
            Ok(false)
        }
    }
}

fn recommend(at_ports: &[&str], out: &mut impl Write) -> io::Result<()> {
    match at_ports {
        [] => {
            writeln!(out, "No AT command ports found!")?;
            writeln!(out, "Make sure:")?;
            writeln!(out, "1. The module is properly connected")?;
            writeln!(out, "2. You have permission to access serial ports")?;
            writeln!(out, "3. The module is powered on")?;
            writeln!(out, "4. Try running with sudo if needed")?;
        }
        [only] => {
            writeln!(out, "AT command ports found: {at_ports:?}")?;
            writeln!(out, "\nRecommended AT port: {only}")?;
        }
        [first, ..] => {
            writeln!(out, "AT command ports found: {at_ports:?}")?;
            writeln!(out, "\nMultiple AT ports found. Try the first one: {first}")?;
        }
    }
    Ok(())
}
