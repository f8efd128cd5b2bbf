//! # cellscope-probe
//!
//! Periodic sampler for cellular modems that speak the Quectel AT dialect.
//! Each cycle issues a fixed set of queries over a [`CommandChannel`],
//! decodes the replies and emits one [`NormalizedRecord`] to a
//! [`RecordSink`].
//!
//! ## Architecture
//!
//! ```text
//! CommandChannel ──▶ decode::* ──▶ Sampler ──▶ RecordSink
//!  (serial/replay)   (pure fns)    (1 record    (CSV / JSON lines)
//!                                  per cycle)
//! ```
//!
//! - [`channel`] — line-oriented AT transport and a scripted replay channel
//! - [`decode`] — one decoder per query type, merged through [`decode::RecordPatch`]
//! - [`assembler`] — the per-cycle query sequence
//! - [`sink`] — durable record output
//! - [`config`] — TOML/CLI configuration resolution
//! - [`summary`] — human-readable console block for a record
//!
//! [`NormalizedRecord`]: cellscope_common::NormalizedRecord

pub mod assembler;
pub mod channel;
pub mod config;
pub mod decode;
pub mod sink;
pub mod summary;

pub use assembler::Sampler;
pub use channel::{ChannelError, CommandChannel, ReplayChannel, SerialChannel};
pub use config::{SamplerConfig, SamplerConfigInput};
pub use sink::{OutputFormat, RecordSink, SinkError, open_sink};
pub use summary::Summary;
