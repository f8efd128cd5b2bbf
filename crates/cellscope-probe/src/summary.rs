//! Console summary of one record.

use std::fmt;

use cellscope_common::{NormalizedRecord, RegistrationState};

const RULE: &str = "────────────────────────────────────────────────────────────";

/// Human-readable block printed after each cycle.
///
/// Empty fields are rendered as `-`.
pub struct Summary<'a>(pub &'a NormalizedRecord);

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn state(value: &Option<RegistrationState>) -> String {
    value.as_ref().map_or_else(|| "-".to_string(), RegistrationState::name)
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        let technology = r.technology.map_or("-", |t| t.as_str());

        writeln!(f, "{RULE}")?;
        writeln!(f, "{}", r.timestamp)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "RRC state:   {}", or_dash(&r.rrc_state))?;
        writeln!(
            f,
            "Technology:  {technology} ({} serving cell(s))",
            r.serving_cell_count
        )?;

        writeln!(f, "Cell:")?;
        writeln!(
            f,
            "  PLMN {}-{}  cell {}  PCI {}  TAC/LAC {}",
            or_dash(&r.mcc),
            or_dash(&r.mnc),
            or_dash(&r.cell_id),
            or_dash(&r.pci),
            or_dash(&r.tac_lac)
        )?;
        writeln!(
            f,
            "  ARFCN {}  band {}  bandwidth {}",
            or_dash(&r.earfcn_arfcn),
            or_dash(&r.band),
            or_dash(&r.bandwidth)
        )?;

        writeln!(f, "Signal:")?;
        writeln!(
            f,
            "  RSRP {}  RSRQ {}  RSSI {}  SINR {}",
            or_dash(&r.rsrp),
            or_dash(&r.rsrq),
            or_dash(&r.rssi),
            or_dash(&r.sinr)
        )?;
        writeln!(
            f,
            "  CQI {}  TX power {}  CSQ {},{}",
            or_dash(&r.cqi),
            or_dash(&r.tx_power),
            or_dash(&r.csq_rssi),
            or_dash(&r.csq_ber)
        )?;

        writeln!(f, "Registration:")?;
        writeln!(f, "  CS   {}", state(&r.cs_state))?;
        writeln!(f, "  PS   {}", state(&r.ps_state))?;
        writeln!(f, "  EPS  {}", state(&r.eps_state))?;
        writeln!(f, "  5GS  {}", state(&r.nr5g_state))?;

        writeln!(f, "Security:")?;
        writeln!(f, "  SIM {}", or_dash(&r.sim_state))?;
        writeln!(
            f,
            "  operator {} ({})",
            or_dash(&r.operator),
            or_dash(&r.operator_mcc_mnc)
        )?;
        match r.attach_state {
            Some(attach) => writeln!(f, "  attach {attach}")?,
            None => writeln!(f, "  attach -")?,
        }

        write!(f, "Neighbors:    {}", r.neighbor_count)?;
        if let Some(best) = r.best_neighbor_rsrp {
            write!(f, " (best {best} dBm)")?;
        }
        writeln!(f)?;
        for cell in r.neighbor_cells.iter() {
            writeln!(f, "  {:<6}{}", cell.tech(), or_dash(cell.strength()))?;
        }
        if !r.ca_info.is_empty() {
            writeln!(f, "CA:           {}", r.ca_info)?;
        }
        write!(f, "{RULE}")
    }
}
