//! Shared types for cellscope.
//!
//! This crate contains:
//! - **Record** — the flat per-cycle `NormalizedRecord` and its column order
//! - **Registration** — NAS `<stat>` code table and the four registration domains
//! - **Neighbor** — technology-tagged neighbor cell entries and their JSON form

pub mod neighbor;
pub mod record;
pub mod registration;

pub use neighbor::{NeighborCell, NeighborList};
pub use record::{AttachState, CellType, NormalizedRecord, Technology};
pub use registration::{RegistrationDomain, RegistrationState};
