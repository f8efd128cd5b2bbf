//! # Record Sinks
//!
//! Durable output for one record per cycle. The CSV sink writes the header
//! (exactly [`NormalizedRecord::COLUMNS`]) when opened and flushes after
//! every row, so a killed process loses at most the in-flight cycle.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use cellscope_common::NormalizedRecord;
use chrono::{DateTime, Local};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Destination for normalized records.
pub trait RecordSink {
    fn append(&mut self, record: &NormalizedRecord) -> Result<(), SinkError>;

    /// Flush everything written so far. The sink must not be used after.
    fn close(&mut self) -> Result<(), SinkError>;

    /// Backing file, when there is one.
    fn path(&self) -> Option<&Path> {
        None
    }
}

// ── Output format ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "csv")]
    Csv,
    #[serde(rename = "jsonl")]
    JsonLines,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::JsonLines => "jsonl",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(OutputFormat::Csv),
            "jsonl" | "json" => Ok(OutputFormat::JsonLines),
            other => Err(format!("unknown output format: {other} (expected csv or jsonl)")),
        }
    }
}

/// `<dir>/rm520n_network_data_<YYYYmmdd_HHMMSS>.<ext>`
pub fn output_path(dir: &Path, format: OutputFormat, started: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "rm520n_network_data_{}.{}",
        started.format("%Y%m%d_%H%M%S"),
        format.extension()
    ))
}

/// Create `dir` if needed and open a timestamped sink inside it.
pub fn open_sink(dir: &Path, format: OutputFormat) -> Result<Box<dyn RecordSink>, SinkError> {
    std::fs::create_dir_all(dir)?;
    let path = output_path(dir, format, Local::now());
    let sink: Box<dyn RecordSink> = match format {
        OutputFormat::Csv => Box::new(CsvSink::create(&path)?),
        OutputFormat::JsonLines => Box::new(JsonLinesSink::create(&path)?),
    };
    tracing::info!(path = %path.display(), %format, "logging records");
    Ok(sink)
}

// ── CSV ─────────────────────────────────────────────────────────────

pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    path: Option<PathBuf>,
    rows: u64,
}

impl CsvSink<File> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut sink = CsvSink::from_writer(file)?;
        sink.path = Some(path.to_path_buf());
        Ok(sink)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap any writer; the header row is written immediately.
    pub fn from_writer(inner: W) -> Result<Self, SinkError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(NormalizedRecord::COLUMNS)?;
        writer.flush()?;
        Ok(CsvSink {
            writer,
            path: None,
            rows: 0,
        })
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn append(&mut self, record: &NormalizedRecord) -> Result<(), SinkError> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        self.rows += 1;
        tracing::debug!(rows = self.rows, "record appended");
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        tracing::info!(rows = self.rows, "CSV sink closed");
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Read a CSV produced by [`CsvSink`] back into records.
pub fn read_csv_records(path: impl AsRef<Path>) -> Result<Vec<NormalizedRecord>, SinkError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

// ── JSON lines ──────────────────────────────────────────────────────

/// One JSON object per line, same field names as the CSV columns.
pub struct JsonLinesSink {
    writer: BufWriter<File>,
    path: PathBuf,
    rows: u64,
}

impl JsonLinesSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let writer = BufWriter::new(File::create(&path)?);
        Ok(JsonLinesSink {
            writer,
            path,
            rows: 0,
        })
    }
}

impl RecordSink for JsonLinesSink {
    fn append(&mut self, record: &NormalizedRecord) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        tracing::info!(rows = self.rows, "JSON lines sink closed");
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}
