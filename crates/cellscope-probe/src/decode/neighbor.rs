//! # Neighbor-cell decoder
//!
//! Decodes `AT+QENG="neighbourcell"`. Each matching line is classified by
//! substring in a fixed order (LTE, then WCDMA, then 5G) and reduced to the
//! technology's field subset. Lines missing a required position are
//! dropped.

use cellscope_common::{NeighborCell, NeighborList, NormalizedRecord};

use super::RecordPatch;
use super::fields::{field, split_fields};

pub const QUERY: &str = "AT+QENG=\"neighbourcell\"";

/// Matches both `"neighbourcell intra"` and `"neighbourcell inter"`.
const NEIGHBOR_MARKER: &str = "+QENG: \"neighbourcell";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborSet {
    pub cells: NeighborList,
}

impl NeighborSet {
    pub fn count(&self) -> usize {
        self.cells.len()
    }

    /// Strongest numeric RSRP/RSCP across the set.
    pub fn best_strength(&self) -> Option<i32> {
        self.cells.best_strength()
    }
}

/// Decode one neighbor line, or `None` if it is not one / is too short.
pub fn decode_neighbor_line(line: &str) -> Option<NeighborCell> {
    if !line.contains(NEIGHBOR_MARKER) {
        return None;
    }
    let parts = split_fields(line);
    let at = |idx: usize| field(&parts, idx);
    let optional = |idx: usize| field(&parts, idx).unwrap_or_default();

    if line.contains("LTE") {
        Some(NeighborCell::Lte {
            earfcn: at(2)?,
            pci: at(3)?,
            rsrq: at(4)?,
            rsrp: at(5)?,
            rssi: at(6)?,
            sinr: at(7)?,
            srxlev: optional(8),
        })
    } else if line.contains("WCDMA") {
        Some(NeighborCell::Wcdma {
            uarfcn: at(2)?,
            psc: at(5)?,
            rscp: at(6)?,
            ecio: at(7)?,
            srxlev: optional(8),
        })
    } else if line.contains("5G") {
        Some(NeighborCell::Nr5g {
            arfcn: at(2)?,
            pci: at(3)?,
            rsrp: at(4)?,
            rsrq: at(5)?,
            sinr: optional(6),
        })
    } else {
        None
    }
}

pub fn decode_neighbors(lines: &[String]) -> NeighborSet {
    let mut cells = Vec::new();
    for line in lines {
        match decode_neighbor_line(line) {
            Some(cell) => {
                tracing::debug!(tech = cell.tech(), strength = cell.strength(), "neighbor cell");
                cells.push(cell);
            }
            None if line.contains(NEIGHBOR_MARKER) => {
                tracing::debug!(line = %line, "neighbor line not decodable, skipped");
            }
            None => {}
        }
    }
    NeighborSet {
        cells: NeighborList(cells),
    }
}

impl RecordPatch for NeighborSet {
    fn apply(self, record: &mut NormalizedRecord) {
        record.neighbor_count = self.count();
        record.best_neighbor_rsrp = self.best_strength();
        record.neighbor_cells = self.cells;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LTE_INTRA: &str =
        r#"+QENG: "neighbourcell intra","LTE",1300,99,-10,-95,-65,12,30,6,8,20"#;
    const LTE_INTER: &str = r#"+QENG: "neighbourcell inter","LTE",6300,210,-14,-108,-80,-2,12,6,8"#;
    const WCDMA: &str = r#"+QENG: "neighbourcell","WCDMA",10700,1,"",300,-88,-7,25"#;
    const NR: &str = r#"+QENG: "neighbourcell","NR5G",632448,500,-101,-12,4"#;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn lte_entry_fields() {
        let cell = decode_neighbor_line(LTE_INTRA).unwrap();
        assert_eq!(
            cell,
            NeighborCell::Lte {
                earfcn: "1300".into(),
                pci: "99".into(),
                rsrq: "-10".into(),
                rsrp: "-95".into(),
                rssi: "-65".into(),
                sinr: "12".into(),
                srxlev: "30".into(),
            }
        );
    }

    #[test]
    fn wcdma_entry_uses_rscp() {
        let cell = decode_neighbor_line(WCDMA).unwrap();
        assert_eq!(cell.tech(), "WCDMA");
        assert_eq!(cell.strength(), "-88");
    }

    #[test]
    fn nr_entry_optional_sinr() {
        let cell = decode_neighbor_line(NR).unwrap();
        assert_eq!(cell.tech(), "5G");
        let short = decode_neighbor_line(r#"+QENG: "neighbourcell","NR5G",632448,500,-101,-12"#)
            .unwrap();
        match short {
            NeighborCell::Nr5g { sinr, .. } => assert_eq!(sinr, ""),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn classification_prefers_lte_then_wcdma_then_5g() {
        // "LTE" tag with a "5G" substring later in the line.
        let lte = decode_neighbor_line(
            r#"+QENG: "neighbourcell intra","LTE",1300,99,-10,-95,-65,12,5G1"#,
        )
        .unwrap();
        assert!(matches!(lte, NeighborCell::Lte { .. }), "{lte:?}");

        // "WCDMA" tag with a "5G" substring.
        let wcdma =
            decode_neighbor_line(r#"+QENG: "neighbourcell","WCDMA",10700,1,"5G",300,-88,-7,25"#)
                .unwrap();
        assert!(matches!(wcdma, NeighborCell::Wcdma { .. }), "{wcdma:?}");
        assert_eq!(wcdma.strength(), "-88");

        // "WCDMA" tag with an "LTE" substring.
        let lte_over_wcdma =
            decode_neighbor_line(r#"+QENG: "neighbourcell","WCDMA",10700,1,"LTE",300,-88,-7,25"#)
                .unwrap();
        assert!(matches!(lte_over_wcdma, NeighborCell::Lte { .. }), "{lte_over_wcdma:?}");
    }

    #[test]
    fn short_lines_are_dropped() {
        assert!(decode_neighbor_line(r#"+QENG: "neighbourcell intra","LTE",1300,99"#).is_none());
        assert!(decode_neighbor_line(r#"+QENG: "neighbourcell","WCDMA",10700"#).is_none());
        assert!(decode_neighbor_line(r#"+QENG: "neighbourcell","GSM",1,2,3,4,5,6"#).is_none());
        assert!(decode_neighbor_line("OK").is_none());
    }

    #[test]
    fn set_derives_count_and_best_strength() {
        let set = decode_neighbors(&lines(&[LTE_INTRA, LTE_INTER, WCDMA, NR, "OK"]));
        assert_eq!(set.count(), 4);
        assert_eq!(set.best_strength(), Some(-88));
    }

    #[test]
    fn non_numeric_strengths_are_excluded() {
        let na = LTE_INTRA.replace("-95", "N/A");
        let set = decode_neighbors(&[na.clone(), LTE_INTER.to_string()]);
        assert_eq!(set.best_strength(), Some(-108));

        let set = decode_neighbors(&[na]);
        assert_eq!(set.count(), 1);
        assert_eq!(set.best_strength(), None);
    }

    #[test]
    fn no_neighbors_yields_empty_fields() {
        let mut rec = NormalizedRecord::default();
        decode_neighbors(&lines(&["OK"])).apply(&mut rec);
        assert_eq!(rec.neighbor_count, 0);
        assert_eq!(rec.best_neighbor_rsrp, None);
        assert!(rec.neighbor_cells.is_empty());
        assert_eq!(rec.neighbor_cells.to_json().unwrap(), "");
    }

    #[test]
    fn decoding_is_idempotent() {
        let input = lines(&[LTE_INTRA, WCDMA, NR]);
        assert_eq!(decode_neighbors(&input), decode_neighbors(&input));
    }
}
