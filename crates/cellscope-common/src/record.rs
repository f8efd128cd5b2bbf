//! The per-cycle normalized record.
//!
//! One `NormalizedRecord` is produced for every sampling cycle, whatever
//! the modem answered. Fields a query could not populate stay at their
//! default (empty string, zero, `None`), which is how "no data" is
//! represented in the output.
//!
//! Field declaration order is the tabular column order and must stay in
//! sync with [`NormalizedRecord::COLUMNS`].

use serde::{Deserialize, Serialize};

use crate::neighbor::NeighborList;
use crate::registration::RegistrationState;

// ── Enumerations ────────────────────────────────────────────────────

/// Radio access technology of the serving cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technology {
    #[serde(rename = "LTE")]
    Lte,
    #[serde(rename = "NR5G-SA")]
    NrSa,
    #[serde(rename = "NR5G-NSA")]
    NrNsa,
    #[serde(rename = "WCDMA")]
    Wcdma,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Technology {
    /// Classify a raw technology tag by substring.
    ///
    /// Checked in the order LTE, NR5G-SA, NR5G-NSA, WCDMA; the first hit
    /// wins.
    pub fn classify(tag: &str) -> Self {
        if tag.contains("LTE") {
            Technology::Lte
        } else if tag.contains("NR5G-SA") {
            Technology::NrSa
        } else if tag.contains("NR5G-NSA") {
            Technology::NrNsa
        } else if tag.contains("WCDMA") {
            Technology::Wcdma
        } else {
            Technology::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Technology::Lte => "LTE",
            Technology::NrSa => "NR5G-SA",
            Technology::NrNsa => "NR5G-NSA",
            Technology::Wcdma => "WCDMA",
            Technology::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Technology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    Serving,
    Neighbor,
}

/// PS attach state from `+CGATT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachState {
    Attached,
    Detached,
}

impl AttachState {
    /// `1` is attached; anything else is detached.
    pub fn from_code(code: &str) -> Self {
        if code == "1" {
            AttachState::Attached
        } else {
            AttachState::Detached
        }
    }
}

impl std::fmt::Display for AttachState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachState::Attached => write!(f, "ATTACHED"),
            AttachState::Detached => write!(f, "DETACHED"),
        }
    }
}

// ── Record ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    // Identity
    pub timestamp: String,
    /// RRC state as reported (`IDLE`, `CONNECT`, `NOCONN`, ...).
    pub rrc_state: String,
    pub cell_type: Option<CellType>,
    pub technology: Option<Technology>,

    // Cell topology
    pub mcc: String,
    pub mnc: String,
    pub cell_id: String,
    pub pci: String,
    pub tac_lac: String,
    pub earfcn_arfcn: String,
    pub band: String,
    pub bandwidth: String,
    /// Sub-carrier spacing (NR only).
    pub scs: String,

    // Signal metrics, verbatim text
    pub rsrp: String,
    pub rsrq: String,
    pub rssi: String,
    pub sinr: String,
    pub cqi: String,
    pub tx_power: String,

    // NAS registration
    pub cs_state: Option<RegistrationState>,
    pub cs_lac: String,
    pub cs_ci: String,
    pub ps_state: Option<RegistrationState>,
    pub ps_lac: String,
    pub ps_ci: String,
    pub eps_state: Option<RegistrationState>,
    pub eps_tac: String,
    pub eps_ci: String,
    pub nr5g_state: Option<RegistrationState>,
    pub nr5g_tac: String,
    pub nr5g_ci: String,

    // Security / identity
    pub sim_state: String,
    pub operator: String,
    pub operator_mcc_mnc: String,
    pub attach_state: Option<AttachState>,

    // Neighbors
    pub neighbor_count: usize,
    pub best_neighbor_rsrp: Option<i32>,
    #[serde(rename = "neighbor_cells_json")]
    pub neighbor_cells: NeighborList,

    // Supplementary
    pub csq_rssi: String,
    pub csq_ber: String,
    /// EN-DC / aggregation companion lines seen in the serving-cell report.
    pub serving_cell_count: u32,
    pub ca_info: String,
}

impl NormalizedRecord {
    /// Tabular column names, in output order.
    pub const COLUMNS: [&'static str; 42] = [
        "timestamp",
        "rrc_state",
        "cell_type",
        "technology",
        "mcc",
        "mnc",
        "cell_id",
        "pci",
        "tac_lac",
        "earfcn_arfcn",
        "band",
        "bandwidth",
        "scs",
        "rsrp",
        "rsrq",
        "rssi",
        "sinr",
        "cqi",
        "tx_power",
        "cs_state",
        "cs_lac",
        "cs_ci",
        "ps_state",
        "ps_lac",
        "ps_ci",
        "eps_state",
        "eps_tac",
        "eps_ci",
        "nr5g_state",
        "nr5g_tac",
        "nr5g_ci",
        "sim_state",
        "operator",
        "operator_mcc_mnc",
        "attach_state",
        "neighbor_count",
        "best_neighbor_rsrp",
        "neighbor_cells_json",
        "csq_rssi",
        "csq_ber",
        "serving_cell_count",
        "ca_info",
    ];

    /// Empty record stamped with `timestamp`.
    pub fn stamped(timestamp: impl Into<String>) -> Self {
        NormalizedRecord {
            timestamp: timestamp.into(),
            ..Default::default()
        }
    }
}
