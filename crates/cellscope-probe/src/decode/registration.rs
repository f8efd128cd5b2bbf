//! Registration-state decoder, shared by the CS / PS / EPS / 5GS queries.
//!
//! Two payload shapes are accepted after the `+CxREG:` prefix:
//!
//! - read form, answer to `AT+CxREG?`: `<n>,<stat>[,<area>,<cell>,...]`
//! - unsolicited form: `<stat>[,<area>,<cell>,...]`
//!
//! They are told apart by the second token: a bare integer there can only
//! be `<stat>` of the read form, while the unsolicited form has a quoted
//! area code in that position.

use cellscope_common::{NormalizedRecord, RegistrationDomain, RegistrationState};

use super::RecordPatch;
use super::fields::{clean, field, is_bare_integer, split_fields};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub domain: RegistrationDomain,
    pub state: Option<RegistrationState>,
    /// LAC (CS/PS) or TAC (EPS/5GS).
    pub area: String,
    pub cell: String,
}

impl Registration {
    pub fn empty(domain: RegistrationDomain) -> Self {
        Registration {
            domain,
            state: None,
            area: String::new(),
            cell: String::new(),
        }
    }
}

/// Decode the response to `domain.query()`.
pub fn decode_registration(domain: RegistrationDomain, lines: &[String]) -> Registration {
    let mut out = Registration::empty(domain);

    for line in lines {
        let Some(payload) = line.strip_prefix(domain.prefix()) else {
            continue;
        };
        let parts = split_fields(payload);
        let stat_idx = if parts.len() >= 2 && is_bare_integer(parts[1]) {
            1
        } else {
            0
        };

        let code = field(&parts, stat_idx).unwrap_or_default();
        if code.is_empty() {
            tracing::debug!(%domain, line = %line, "registration line without state, skipped");
            continue;
        }
        out.state = Some(RegistrationState::from_code(&code));

        if parts.len() >= stat_idx + 3 {
            out.area = clean(parts[stat_idx + 1]);
            out.cell = clean(parts[stat_idx + 2]);
        }
    }

    out
}

impl RecordPatch for Registration {
    fn apply(self, record: &mut NormalizedRecord) {
        let (state, area, cell) = match self.domain {
            RegistrationDomain::Circuit => {
                (&mut record.cs_state, &mut record.cs_lac, &mut record.cs_ci)
            }
            RegistrationDomain::Packet => {
                (&mut record.ps_state, &mut record.ps_lac, &mut record.ps_ci)
            }
            RegistrationDomain::Eps => {
                (&mut record.eps_state, &mut record.eps_tac, &mut record.eps_ci)
            }
            RegistrationDomain::Nr5g => {
                (&mut record.nr5g_state, &mut record.nr5g_tac, &mut record.nr5g_ci)
            }
        };
        *state = self.state;
        *area = self.area;
        *cell = self.cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(domain: RegistrationDomain, raw: &[&str]) -> Registration {
        let lines: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        decode_registration(domain, &lines)
    }

    #[test]
    fn unsolicited_form_with_location() {
        let reg = decode(RegistrationDomain::Eps, &[r#"+CEREG: 1,"1A2B","3C4D5E""#, "OK"]);
        assert_eq!(reg.state, Some(RegistrationState::RegisteredHome));
        assert_eq!(reg.area, "1A2B");
        assert_eq!(reg.cell, "3C4D5E");
    }

    #[test]
    fn read_form_with_location() {
        let reg = decode(
            RegistrationDomain::Circuit,
            &[r#"+CREG: 2,5,"00C3","01A2B3C",7"#, "OK"],
        );
        assert_eq!(reg.state, Some(RegistrationState::RegisteredRoaming));
        assert_eq!(reg.area, "00C3");
        assert_eq!(reg.cell, "01A2B3C");
    }

    #[test]
    fn read_form_without_location() {
        let reg = decode(RegistrationDomain::Packet, &["+CGREG: 0,2", "OK"]);
        assert_eq!(reg.state, Some(RegistrationState::Searching));
        assert!(reg.area.is_empty());
        assert!(reg.cell.is_empty());
    }

    #[test]
    fn area_without_cell_is_not_captured() {
        let reg = decode(RegistrationDomain::Nr5g, &[r#"+C5GREG: 2,1,"00AB""#]);
        assert_eq!(reg.state, Some(RegistrationState::RegisteredHome));
        assert!(reg.area.is_empty());
    }

    #[test]
    fn unmapped_code_is_preserved() {
        let reg = decode(RegistrationDomain::Nr5g, &["+C5GREG: 2,42"]);
        assert_eq!(reg.state.map(|s| s.to_string()).as_deref(), Some("UNKNOWN_42"));
    }

    #[test]
    fn all_defined_codes_through_the_decoder() {
        for code in 0..=10 {
            let line = format!("+CEREG: 2,{code}");
            let reg = decode_registration(RegistrationDomain::Eps, &[line]);
            assert_eq!(reg.state, Some(RegistrationState::from_code(&code.to_string())));
            assert!(!matches!(reg.state, Some(RegistrationState::Unmapped(_))));
        }
    }

    #[test]
    fn other_domains_lines_are_ignored() {
        let reg = decode(RegistrationDomain::Circuit, &["+CGREG: 0,1", "+CEREG: 0,1"]);
        assert_eq!(reg, Registration::empty(RegistrationDomain::Circuit));
    }

    #[test]
    fn empty_state_token_is_skipped() {
        let reg = decode(RegistrationDomain::Circuit, &["+CREG:", "+CREG: ,"]);
        assert!(reg.state.is_none());
    }

    #[test]
    fn patch_targets_the_right_domain() {
        let mut rec = NormalizedRecord::default();
        decode(RegistrationDomain::Eps, &[r#"+CEREG: 1,"1A2B","3C4D5E""#]).apply(&mut rec);
        decode(RegistrationDomain::Circuit, &["+CREG: 0,3"]).apply(&mut rec);
        assert_eq!(rec.eps_state, Some(RegistrationState::RegisteredHome));
        assert_eq!(rec.eps_tac, "1A2B");
        assert_eq!(rec.eps_ci, "3C4D5E");
        assert_eq!(rec.cs_state, Some(RegistrationState::Denied));
        assert!(rec.ps_state.is_none());
        assert!(rec.nr5g_state.is_none());
    }
}
