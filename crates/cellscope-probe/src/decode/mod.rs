//! # Response Decoders
//!
//! One decoder per query type. Every decoder is a pure function from the
//! response lines to a partial-update value; the assembler merges those
//! values into the cycle's [`NormalizedRecord`] through [`RecordPatch`].
//!
//! Decoders never fail. Short, malformed or foreign lines are logged at
//! `debug` and skipped, leaving the affected fields at their default.
//! Each patch owns a disjoint set of record fields, so patches commute.

pub mod auth;
pub mod fields;
pub mod metrics;
pub mod neighbor;
pub mod registration;
pub mod serving;

use cellscope_common::NormalizedRecord;

pub use auth::{AuthInfo, decode_auth};
pub use metrics::{SignalMetrics, decode_signal_metrics};
pub use neighbor::{NeighborSet, decode_neighbors};
pub use registration::{Registration, decode_registration};
pub use serving::{ServingCell, decode_serving_cell};

/// A decoder's output, merged into the record of the current cycle.
pub trait RecordPatch {
    fn apply(self, record: &mut NormalizedRecord);
}
