//! Property-based tests for the response decoders.

use cellscope_common::{NormalizedRecord, RegistrationDomain};
use cellscope_probe::decode::{
    RecordPatch, decode_auth, decode_neighbors, decode_registration, decode_serving_cell,
    decode_signal_metrics,
};
use proptest::prelude::*;

const STATE_NAMES: [&str; 11] = [
    "NOT_REGISTERED",
    "REGISTERED_HOME",
    "SEARCHING",
    "DENIED",
    "UNKNOWN",
    "REGISTERED_ROAMING",
    "REGISTERED_SMS_ONLY_HOME",
    "REGISTERED_SMS_ONLY_ROAMING",
    "EMERGENCY_ONLY",
    "REGISTERED_CSFB_NOT_PREFERRED_HOME",
    "REGISTERED_CSFB_NOT_PREFERRED_ROAMING",
];

/// Lines that look like modem output often enough to reach the decoders.
fn modem_line() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "[ -~]{0,80}",
        "\\+QENG: \"servingcell\",[A-Z\",0-9-]{0,60}",
        "\\+QENG: \"neighbourcell( intra| inter)?\",\"(LTE|WCDMA|NR5G)\"[,0-9A-Z/\"-]{0,50}",
        "\\+C(E|G|5G)?REG: [0-9,\"A-F]{0,30}",
        "\\+(CPIN|COPS|CGATT|CSQ|QCAINFO): [ -~]{0,40}",
    ]
}

/// A neighbor strength token: an integer or a non-numeric placeholder.
fn strength() -> impl Strategy<Value = String> {
    prop_oneof![
        (-140i32..=-40).prop_map(|v| v.to_string()),
        Just("N/A".to_string()),
        Just(String::new()),
        Just("-".to_string()),
    ]
}

// ─── Robustness ─────────────────────────────────────────────────────────────

proptest! {
    /// No decoder panics on arbitrary input, and each is deterministic.
    #[test]
    fn decoders_never_panic(lines in prop::collection::vec(modem_line(), 0..8)) {
        let serving = decode_serving_cell(&lines);
        prop_assert_eq!(&serving, &decode_serving_cell(&lines));

        for domain in RegistrationDomain::ALL {
            let reg = decode_registration(domain, &lines);
            prop_assert_eq!(&reg, &decode_registration(domain, &lines));
        }

        let auth = decode_auth(&lines, &lines, &lines);
        let neighbors = decode_neighbors(&lines);
        let metrics = decode_signal_metrics(&lines, &lines);

        let mut rec = NormalizedRecord::default();
        serving.apply(&mut rec);
        auth.apply(&mut rec);
        neighbors.apply(&mut rec);
        metrics.apply(&mut rec);
        prop_assert_eq!(rec.neighbor_count, rec.neighbor_cells.len());
    }
}

// ─── Registration codes ─────────────────────────────────────────────────────

proptest! {
    /// Codes 0–10 map to their names; any other token X maps to UNKNOWN_X.
    #[test]
    fn registration_code_mapping(code in "[0-9]{1,3}") {
        let line = format!("+CEREG: 2,{code}");
        let reg = decode_registration(RegistrationDomain::Eps, &[line]);
        let state = reg.state.expect("stat token present");

        let expected = match code.parse::<usize>() {
            Ok(n) if n < STATE_NAMES.len() && n.to_string() == code => STATE_NAMES[n].to_string(),
            _ => format!("UNKNOWN_{code}"),
        };
        prop_assert_eq!(state.to_string(), expected);
    }
}

// ─── Neighbor strength ──────────────────────────────────────────────────────

proptest! {
    /// Best strength is the maximum over the numeric entries only.
    #[test]
    fn best_strength_is_max_of_numeric(rsrps in prop::collection::vec(strength(), 0..10)) {
        let lines: Vec<String> = rsrps
            .iter()
            .enumerate()
            .map(|(i, rsrp)| {
                format!(r#"+QENG: "neighbourcell intra","LTE",1300,{i},-10,{rsrp},-65,12,30"#)
            })
            .collect();

        let set = decode_neighbors(&lines);
        prop_assert_eq!(set.count(), rsrps.len());

        let expected = rsrps.iter().filter_map(|s| s.parse::<i32>().ok()).max();
        prop_assert_eq!(set.best_strength(), expected);
    }
}
