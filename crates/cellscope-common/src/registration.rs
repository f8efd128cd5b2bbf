//! NAS registration states and the four registration domains.
//!
//! Every `+CxREG` response carries a numeric `<stat>` code. The code is
//! mapped through a fixed 3GPP table (TS 27.007 §7.2) to a symbolic name.
//! Codes outside the table are kept as `UNKNOWN_<code>` so a firmware that
//! reports something new still produces a usable record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Registration state ──────────────────────────────────────────────

/// Decoded `<stat>` of a registration query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegistrationState {
    NotRegistered,
    RegisteredHome,
    Searching,
    Denied,
    /// Code 4: the modem itself reports "unknown".
    Unknown,
    RegisteredRoaming,
    RegisteredSmsOnlyHome,
    RegisteredSmsOnlyRoaming,
    EmergencyOnly,
    RegisteredCsfbNotPreferredHome,
    RegisteredCsfbNotPreferredRoaming,
    /// A code outside the table, kept verbatim.
    Unmapped(String),
}

/// Code → variant table. Index is the wire code.
static STATE_TABLE: [(&str, RegistrationState); 11] = [
    ("NOT_REGISTERED", RegistrationState::NotRegistered),
    ("REGISTERED_HOME", RegistrationState::RegisteredHome),
    ("SEARCHING", RegistrationState::Searching),
    ("DENIED", RegistrationState::Denied),
    ("UNKNOWN", RegistrationState::Unknown),
    ("REGISTERED_ROAMING", RegistrationState::RegisteredRoaming),
    ("REGISTERED_SMS_ONLY_HOME", RegistrationState::RegisteredSmsOnlyHome),
    ("REGISTERED_SMS_ONLY_ROAMING", RegistrationState::RegisteredSmsOnlyRoaming),
    ("EMERGENCY_ONLY", RegistrationState::EmergencyOnly),
    (
        "REGISTERED_CSFB_NOT_PREFERRED_HOME",
        RegistrationState::RegisteredCsfbNotPreferredHome,
    ),
    (
        "REGISTERED_CSFB_NOT_PREFERRED_ROAMING",
        RegistrationState::RegisteredCsfbNotPreferredRoaming,
    ),
];

const UNMAPPED_PREFIX: &str = "UNKNOWN_";

impl RegistrationState {
    /// Decode a raw `<stat>` token. Never fails.
    ///
    /// Matching is on the exact token text: `"01"` is not code 1.
    pub fn from_code(code: &str) -> Self {
        STATE_TABLE
            .iter()
            .enumerate()
            .find(|(idx, _)| idx.to_string() == code)
            .map(|(_, (_, state))| state.clone())
            .unwrap_or_else(|| RegistrationState::Unmapped(code.to_string()))
    }

    /// Symbolic name as written to records.
    pub fn name(&self) -> String {
        match self {
            RegistrationState::Unmapped(code) => format!("{UNMAPPED_PREFIX}{code}"),
            known => STATE_TABLE
                .iter()
                .find(|(_, s)| s == known)
                .map(|(name, _)| (*name).to_string())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for RegistrationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((_, state)) = STATE_TABLE.iter().find(|(name, _)| *name == s) {
            return Ok(state.clone());
        }
        match s.strip_prefix(UNMAPPED_PREFIX) {
            Some(code) => Ok(RegistrationState::Unmapped(code.to_string())),
            None => Err(format!("unknown registration state: {s}")),
        }
    }
}

impl Serialize for RegistrationState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for RegistrationState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ── Registration domain ─────────────────────────────────────────────

/// The four NAS domains polled each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationDomain {
    /// Circuit switched (`+CREG`).
    Circuit,
    /// Packet switched / GPRS (`+CGREG`).
    Packet,
    /// EPS / LTE (`+CEREG`).
    Eps,
    /// 5GS (`+C5GREG`).
    Nr5g,
}

impl RegistrationDomain {
    /// All domains in polling order.
    pub const ALL: [RegistrationDomain; 4] = [
        RegistrationDomain::Circuit,
        RegistrationDomain::Packet,
        RegistrationDomain::Eps,
        RegistrationDomain::Nr5g,
    ];

    /// Read query for this domain.
    pub fn query(self) -> &'static str {
        match self {
            RegistrationDomain::Circuit => "AT+CREG?",
            RegistrationDomain::Packet => "AT+CGREG?",
            RegistrationDomain::Eps => "AT+CEREG?",
            RegistrationDomain::Nr5g => "AT+C5GREG?",
        }
    }

    /// Command enabling unsolicited registration reports with location info.
    pub fn enable_urc(self) -> &'static str {
        match self {
            RegistrationDomain::Circuit => "AT+CREG=2",
            RegistrationDomain::Packet => "AT+CGREG=2",
            RegistrationDomain::Eps => "AT+CEREG=2",
            RegistrationDomain::Nr5g => "AT+C5GREG=2",
        }
    }

    /// Response line prefix, including the colon.
    pub fn prefix(self) -> &'static str {
        match self {
            RegistrationDomain::Circuit => "+CREG:",
            RegistrationDomain::Packet => "+CGREG:",
            RegistrationDomain::Eps => "+CEREG:",
            RegistrationDomain::Nr5g => "+C5GREG:",
        }
    }
}

impl fmt::Display for RegistrationDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationDomain::Circuit => write!(f, "cs"),
            RegistrationDomain::Packet => write!(f, "ps"),
            RegistrationDomain::Eps => write!(f, "eps"),
            RegistrationDomain::Nr5g => write!(f, "nr5g"),
        }
    }
}
