//! Neighbor cell entries reported by `AT+QENG="neighbourcell"`.
//!
//! Each entry keeps the raw text of the fields the modem reported for its
//! technology. The list is exported as a JSON array of objects tagged with
//! `"tech"`, e.g. `{"tech":"LTE","earfcn":"1300","pci":"12",...}`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One neighbor cell, tagged by technology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tech")]
pub enum NeighborCell {
    #[serde(rename = "LTE")]
    Lte {
        earfcn: String,
        pci: String,
        rsrq: String,
        rsrp: String,
        rssi: String,
        sinr: String,
        srxlev: String,
    },
    #[serde(rename = "WCDMA")]
    Wcdma {
        uarfcn: String,
        psc: String,
        rscp: String,
        ecio: String,
        srxlev: String,
    },
    #[serde(rename = "5G")]
    Nr5g {
        arfcn: String,
        pci: String,
        rsrp: String,
        rsrq: String,
        sinr: String,
    },
}

impl NeighborCell {
    /// Received power: RSRP, or RSCP for WCDMA entries.
    pub fn strength(&self) -> &str {
        match self {
            NeighborCell::Lte { rsrp, .. } | NeighborCell::Nr5g { rsrp, .. } => rsrp.as_str(),
            NeighborCell::Wcdma { rscp, .. } => rscp.as_str(),
        }
    }

    /// Received power as an integer, when the modem reported one.
    ///
    /// `N/A`, empty and non-integer values yield `None`.
    pub fn strength_dbm(&self) -> Option<i32> {
        let raw = self.strength().trim();
        if raw.is_empty() || raw == "N/A" {
            return None;
        }
        raw.parse().ok()
    }

    pub fn tech(&self) -> &'static str {
        match self {
            NeighborCell::Lte { .. } => "LTE",
            NeighborCell::Wcdma { .. } => "WCDMA",
            NeighborCell::Nr5g { .. } => "5G",
        }
    }
}

/// Ordered neighbor list carried by a record.
///
/// In tabular form the whole list occupies one column: a JSON array, or an
/// empty string when there are no neighbors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborList(pub Vec<NeighborCell>);

impl NeighborList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NeighborCell> {
        self.0.iter()
    }

    /// Strongest integer strength across all entries.
    pub fn best_strength(&self) -> Option<i32> {
        self.0.iter().filter_map(NeighborCell::strength_dbm).max()
    }

    /// JSON payload; empty string for an empty list.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        if self.0.is_empty() {
            return Ok(String::new());
        }
        serde_json::to_string(&self.0)
    }

    /// Inverse of [`NeighborList::to_json`].
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        if s.trim().is_empty() {
            return Ok(NeighborList::default());
        }
        serde_json::from_str(s).map(NeighborList)
    }
}

impl From<Vec<NeighborCell>> for NeighborList {
    fn from(cells: Vec<NeighborCell>) -> Self {
        NeighborList(cells)
    }
}

impl Serialize for NeighborList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let json = self.to_json().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&json)
    }
}

impl<'de> Deserialize<'de> for NeighborList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        NeighborList::from_json(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lte(rsrp: &str) -> NeighborCell {
        NeighborCell::Lte {
            earfcn: "1300".into(),
            pci: "12".into(),
            rsrq: "-11".into(),
            rsrp: rsrp.into(),
            rssi: "-70".into(),
            sinr: "5".into(),
            srxlev: String::new(),
        }
    }

    fn wcdma(rscp: &str) -> NeighborCell {
        NeighborCell::Wcdma {
            uarfcn: "10700".into(),
            psc: "300".into(),
            rscp: rscp.into(),
            ecio: "-6".into(),
            srxlev: "20".into(),
        }
    }

    #[test]
    fn wcdma_strength_falls_back_to_rscp() {
        assert_eq!(wcdma("-88").strength(), "-88");
        assert_eq!(wcdma("-88").strength_dbm(), Some(-88));
    }

    #[test]
    fn best_strength_ignores_non_numeric() {
        let list = NeighborList(vec![lte("-101"), lte("N/A"), wcdma("-88"), lte(""), lte("x")]);
        assert_eq!(list.best_strength(), Some(-88));
    }

    #[test]
    fn best_strength_all_non_numeric_is_none() {
        let list = NeighborList(vec![lte("N/A"), lte("")]);
        assert_eq!(list.best_strength(), None);
        assert_eq!(NeighborList::default().best_strength(), None);
    }

    #[test]
    fn json_is_tagged_by_tech() {
        let list = NeighborList(vec![lte("-95")]);
        let json = list.to_json().unwrap();
        assert!(json.starts_with(r#"[{"tech":"LTE","earfcn":"1300""#), "{json}");
        assert_eq!(NeighborList::from_json(&json).unwrap(), list);
    }

    #[test]
    fn empty_list_is_empty_string() {
        assert_eq!(NeighborList::default().to_json().unwrap(), "");
        assert!(NeighborList::from_json("").unwrap().is_empty());
    }
}
