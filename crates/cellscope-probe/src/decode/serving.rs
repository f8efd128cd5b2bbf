//! # Serving-cell decoder
//!
//! Decodes `AT+QENG="servingcell"`. The serving line carries a common
//! prefix (RRC state, technology tag) followed by a technology-specific
//! positional layout. Each layout is a [`FieldLayout`]: a minimum token
//! count and an explicit list of `(token index, field)` pairs.
//!
//! EN-DC / aggregation companion lines (`+QENG: "LTE",...` and
//! `+QENG: "NR5G-NSA",...`) are only counted.

use cellscope_common::{CellType, NormalizedRecord, Technology};

use super::RecordPatch;
use super::fields::{field, split_fields};

pub const QUERY: &str = "AT+QENG=\"servingcell\"";
/// One-time setup command selecting the serving-cell report format.
pub const FORMAT_COMMAND: &str = "AT+QENG=\"servingcell\",1";

const SERVING_MARKER: &str = "+QENG: \"servingcell\"";
const COMPANION_MARKERS: [&str; 2] = ["+QENG: \"LTE\"", "+QENG: \"NR5G-NSA\""];

/// Normalized serving-cell parameter a layout can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellField {
    Mcc,
    Mnc,
    CellId,
    Pci,
    TacLac,
    Arfcn,
    Band,
    Bandwidth,
    Scs,
    Rsrp,
    Rsrq,
    Rssi,
    Sinr,
    Cqi,
    TxPower,
}

/// Positional layout of one technology's serving-cell line.
#[derive(Debug)]
pub struct FieldLayout {
    pub technology: Technology,
    /// Lines with fewer tokens are skipped entirely.
    pub min_fields: usize,
    pub fields: &'static [(usize, CellField)],
}

pub static LTE_LAYOUT: FieldLayout = FieldLayout {
    technology: Technology::Lte,
    min_fields: 18,
    fields: &[
        (4, CellField::Mcc),
        (5, CellField::Mnc),
        (6, CellField::CellId),
        (7, CellField::Pci),
        (8, CellField::Arfcn),
        (9, CellField::Band),
        (10, CellField::Bandwidth),
        (11, CellField::TacLac),
        (12, CellField::Rsrp),
        (13, CellField::Rsrq),
        (14, CellField::Rssi),
        (15, CellField::Sinr),
        (16, CellField::Cqi),
        (17, CellField::TxPower),
    ],
};

pub static NR_SA_LAYOUT: FieldLayout = FieldLayout {
    technology: Technology::NrSa,
    min_fields: 17,
    fields: &[
        (4, CellField::Mcc),
        (5, CellField::Mnc),
        (6, CellField::CellId),
        (7, CellField::Pci),
        (8, CellField::TacLac),
        (9, CellField::Arfcn),
        (10, CellField::Band),
        (11, CellField::Bandwidth),
        (12, CellField::Rsrp),
        (13, CellField::Rsrq),
        (14, CellField::Sinr),
        (15, CellField::Rssi),
        (16, CellField::TxPower),
    ],
};

/// NSA reports use the short EN-DC layout starting right after the marker.
pub static NR_NSA_LAYOUT: FieldLayout = FieldLayout {
    technology: Technology::NrNsa,
    min_fields: 11,
    fields: &[
        (1, CellField::Mcc),
        (2, CellField::Mnc),
        (3, CellField::Pci),
        (4, CellField::Rsrp),
        (5, CellField::Sinr),
        (6, CellField::Rsrq),
        (7, CellField::Arfcn),
        (8, CellField::Band),
        (9, CellField::Bandwidth),
        (10, CellField::Scs),
    ],
};

/// WCDMA: PSC lands in `pci`, RSCP in `rsrp`, Ec/Io in `rsrq`.
pub static WCDMA_LAYOUT: FieldLayout = FieldLayout {
    technology: Technology::Wcdma,
    min_fields: 17,
    fields: &[
        (4, CellField::Mcc),
        (5, CellField::Mnc),
        (6, CellField::TacLac),
        (7, CellField::CellId),
        (8, CellField::Arfcn),
        (9, CellField::Pci),
        (11, CellField::Rsrp),
        (12, CellField::Rsrq),
    ],
};

/// Layout for a classified technology; `Unknown` has none.
pub fn layout_for(technology: Technology) -> Option<&'static FieldLayout> {
    match technology {
        Technology::Lte => Some(&LTE_LAYOUT),
        Technology::NrSa => Some(&NR_SA_LAYOUT),
        Technology::NrNsa => Some(&NR_NSA_LAYOUT),
        Technology::Wcdma => Some(&WCDMA_LAYOUT),
        Technology::Unknown => None,
    }
}

/// Serving-cell parameters, verbatim text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellParams {
    pub mcc: String,
    pub mnc: String,
    pub cell_id: String,
    pub pci: String,
    pub tac_lac: String,
    pub earfcn_arfcn: String,
    pub band: String,
    pub bandwidth: String,
    pub scs: String,
    pub rsrp: String,
    pub rsrq: String,
    pub rssi: String,
    pub sinr: String,
    pub cqi: String,
    pub tx_power: String,
}

impl CellParams {
    pub fn get(&self, f: CellField) -> &str {
        match f {
            CellField::Mcc => &self.mcc,
            CellField::Mnc => &self.mnc,
            CellField::CellId => &self.cell_id,
            CellField::Pci => &self.pci,
            CellField::TacLac => &self.tac_lac,
            CellField::Arfcn => &self.earfcn_arfcn,
            CellField::Band => &self.band,
            CellField::Bandwidth => &self.bandwidth,
            CellField::Scs => &self.scs,
            CellField::Rsrp => &self.rsrp,
            CellField::Rsrq => &self.rsrq,
            CellField::Rssi => &self.rssi,
            CellField::Sinr => &self.sinr,
            CellField::Cqi => &self.cqi,
            CellField::TxPower => &self.tx_power,
        }
    }

    fn slot_mut(&mut self, f: CellField) -> &mut String {
        match f {
            CellField::Mcc => &mut self.mcc,
            CellField::Mnc => &mut self.mnc,
            CellField::CellId => &mut self.cell_id,
            CellField::Pci => &mut self.pci,
            CellField::TacLac => &mut self.tac_lac,
            CellField::Arfcn => &mut self.earfcn_arfcn,
            CellField::Band => &mut self.band,
            CellField::Bandwidth => &mut self.bandwidth,
            CellField::Scs => &mut self.scs,
            CellField::Rsrp => &mut self.rsrp,
            CellField::Rsrq => &mut self.rsrq,
            CellField::Rssi => &mut self.rssi,
            CellField::Sinr => &mut self.sinr,
            CellField::Cqi => &mut self.cqi,
            CellField::TxPower => &mut self.tx_power,
        }
    }
}

impl FieldLayout {
    /// Apply this layout to a split line. Returns `false` (and touches
    /// nothing) when the line is shorter than `min_fields`.
    pub fn apply(&self, parts: &[&str], params: &mut CellParams) -> bool {
        if parts.len() < self.min_fields {
            tracing::debug!(
                technology = %self.technology,
                fields = parts.len(),
                min = self.min_fields,
                "serving cell line too short, skipped"
            );
            return false;
        }
        for &(idx, target) in self.fields {
            if let Some(value) = field(parts, idx) {
                *params.slot_mut(target) = value;
            }
        }
        true
    }
}

/// Decoded serving-cell report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServingCell {
    pub rrc_state: String,
    pub cell_type: Option<CellType>,
    pub technology: Option<Technology>,
    pub params: CellParams,
    /// Companion lines seen (EN-DC / carrier aggregation).
    pub companion_cells: u32,
}

pub fn decode_serving_cell(lines: &[String]) -> ServingCell {
    let mut out = ServingCell::default();

    for line in lines {
        let parts = split_fields(line);
        let head = parts.first().map(|t| t.trim()).unwrap_or_default();

        if head == SERVING_MARKER {
            if parts.len() < 3 {
                tracing::debug!(line = %line, "serving cell line without technology, skipped");
                continue;
            }
            let rrc_state = field(&parts, 1).unwrap_or_default();
            let tag = field(&parts, 2).unwrap_or_default();
            let technology = Technology::classify(&tag);

            out.rrc_state = rrc_state;
            out.technology = Some(technology);
            out.cell_type = Some(CellType::Serving);

            match layout_for(technology) {
                Some(layout) => {
                    layout.apply(&parts, &mut out.params);
                }
                None => tracing::debug!(tag = %tag, "unrecognized serving cell technology"),
            }
        } else if COMPANION_MARKERS.iter().any(|m| line.starts_with(m)) {
            out.companion_cells += 1;
        }
    }

    out
}

impl RecordPatch for ServingCell {
    fn apply(self, record: &mut NormalizedRecord) {
        let p = self.params;
        record.rrc_state = self.rrc_state;
        record.cell_type = self.cell_type;
        record.technology = self.technology;
        record.mcc = p.mcc;
        record.mnc = p.mnc;
        record.cell_id = p.cell_id;
        record.pci = p.pci;
        record.tac_lac = p.tac_lac;
        record.earfcn_arfcn = p.earfcn_arfcn;
        record.band = p.band;
        record.bandwidth = p.bandwidth;
        record.scs = p.scs;
        record.rsrp = p.rsrp;
        record.rsrq = p.rsrq;
        record.rssi = p.rssi;
        record.sinr = p.sinr;
        record.cqi = p.cqi;
        record.tx_power = p.tx_power;
        record.serving_cell_count += self.companion_cells;
    }
}
