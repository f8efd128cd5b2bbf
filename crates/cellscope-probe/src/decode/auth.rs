//! SIM, operator and attach-state decoding.

use cellscope_common::{AttachState, NormalizedRecord};

use super::RecordPatch;
use super::fields::{after_colon, field, split_fields};

pub const SIM_QUERY: &str = "AT+CPIN?";
pub const OPERATOR_QUERY: &str = "AT+COPS?";
pub const ATTACH_QUERY: &str = "AT+CGATT?";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthInfo {
    pub sim_state: String,
    pub operator: String,
    pub operator_mcc_mnc: String,
    pub attach_state: Option<AttachState>,
}

/// `+CPIN: READY` → `READY`. Last matching line wins.
pub fn decode_sim_state(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .filter(|l| l.starts_with("+CPIN:"))
        .filter_map(|l| after_colon(l))
        .map(str::to_string)
        .last()
}

/// `+COPS: <mode>,<format>,"<oper>"[,<code>]` → (oper, code).
///
/// Positions are taken from the whole comma-split line, so the operator is
/// token 2 and the code token 3.
pub fn decode_operator(lines: &[String]) -> Option<(String, String)> {
    let mut out = None;
    for line in lines.iter().filter(|l| l.starts_with("+COPS:")) {
        let parts = split_fields(line);
        if parts.len() < 3 {
            tracing::debug!(line = %line, "operator not selected");
            continue;
        }
        let name = field(&parts, 2).unwrap_or_default();
        let code = field(&parts, 3).unwrap_or_default();
        out = Some((name, code));
    }
    out
}

/// `+CGATT: 1` → attached, any other code → detached.
pub fn decode_attach_state(lines: &[String]) -> Option<AttachState> {
    lines
        .iter()
        .filter(|l| l.starts_with("+CGATT:"))
        .filter_map(|l| after_colon(l))
        .map(AttachState::from_code)
        .last()
}

/// Combine the three independent sub-extractions.
pub fn decode_auth(sim: &[String], operator: &[String], attach: &[String]) -> AuthInfo {
    let (operator, operator_mcc_mnc) = decode_operator(operator).unwrap_or_default();
    AuthInfo {
        sim_state: decode_sim_state(sim).unwrap_or_default(),
        operator,
        operator_mcc_mnc,
        attach_state: decode_attach_state(attach),
    }
}

impl RecordPatch for AuthInfo {
    fn apply(self, record: &mut NormalizedRecord) {
        record.sim_state = self.sim_state;
        record.operator = self.operator;
        record.operator_mcc_mnc = self.operator_mcc_mnc;
        record.attach_state = self.attach_state;
    }
}
