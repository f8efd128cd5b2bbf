//! `+CSQ` signal quality and `+QCAINFO` carrier-aggregation summary.

use cellscope_common::NormalizedRecord;

use super::RecordPatch;
use super::fields::after_colon;

pub const CSQ_QUERY: &str = "AT+CSQ";
pub const CA_QUERY: &str = "AT+QCAINFO";

const CA_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalMetrics {
    pub csq_rssi: String,
    pub csq_ber: String,
    pub ca_info: String,
}

/// `+CSQ: <rssi>,<ber>` → (rssi, ber).
pub fn decode_csq(lines: &[String]) -> Option<(String, String)> {
    let mut out = None;
    for line in lines.iter().filter(|l| l.starts_with("+CSQ:")) {
        let Some(payload) = after_colon(line) else {
            continue;
        };
        let mut parts = payload.split(',').map(str::trim);
        match (parts.next(), parts.next()) {
            (Some(rssi), Some(ber)) => out = Some((rssi.to_string(), ber.to_string())),
            _ => tracing::debug!(line = %line, "CSQ line without BER, skipped"),
        }
    }
    out
}

/// Every `+QCAINFO:` payload, joined with `"; "`.
pub fn decode_ca_info(lines: &[String]) -> String {
    lines
        .iter()
        .filter(|l| l.starts_with("+QCAINFO:"))
        .filter_map(|l| after_colon(l))
        .collect::<Vec<_>>()
        .join(CA_SEPARATOR)
}

pub fn decode_signal_metrics(csq: &[String], ca: &[String]) -> SignalMetrics {
    let (csq_rssi, csq_ber) = decode_csq(csq).unwrap_or_default();
    SignalMetrics {
        csq_rssi,
        csq_ber,
        ca_info: decode_ca_info(ca),
    }
}

impl RecordPatch for SignalMetrics {
    fn apply(self, record: &mut NormalizedRecord) {
        record.csq_rssi = self.csq_rssi;
        record.csq_ber = self.csq_ber;
        record.ca_info = self.ca_info;
    }
}
