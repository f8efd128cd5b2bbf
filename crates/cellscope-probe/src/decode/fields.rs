//! Field-normalization helpers shared by the decoders.
//!
//! Modem responses are comma-delimited with optional double quotes around
//! text fields. Splitting has no quote awareness; the positional tables in
//! the decoders are expressed against this split.

/// Split a response line on commas.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').collect()
}

/// Trim whitespace and surrounding double quotes from a raw token.
pub fn clean(token: &str) -> String {
    token.trim().trim_matches('"').to_string()
}

/// Cleaned token at `idx`, if the line has one.
pub fn field(parts: &[&str], idx: usize) -> Option<String> {
    parts.get(idx).map(|token| clean(token))
}

/// Text after the first colon, trimmed. `"+CPIN: READY"` → `"READY"`.
pub fn after_colon(line: &str) -> Option<&str> {
    line.split_once(':').map(|(_, rest)| rest.trim())
}

/// Whether a token is a bare (unquoted) decimal integer.
pub fn is_bare_integer(token: &str) -> bool {
    let t = token.trim();
    !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_quotes_and_space() {
        assert_eq!(clean(" \"LTE\" "), "LTE");
        assert_eq!(clean("-95"), "-95");
        assert_eq!(clean("\"\""), "");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn field_out_of_range_is_none() {
        let parts = split_fields("a,\"b\"");
        assert_eq!(field(&parts, 1).as_deref(), Some("b"));
        assert_eq!(field(&parts, 2), None);
    }

    #[test]
    fn after_colon_takes_first_colon_only() {
        assert_eq!(after_colon("+QCAINFO: \"pcc\",1300"), Some("\"pcc\",1300"));
        assert_eq!(after_colon("+CPIN: SIM PIN"), Some("SIM PIN"));
        assert_eq!(after_colon("no colon"), None);
    }

    #[test]
    fn bare_integer_detection() {
        assert!(is_bare_integer("1"));
        assert!(is_bare_integer(" 10 "));
        assert!(!is_bare_integer("\"1A2B\""));
        assert!(!is_bare_integer(""));
        assert!(!is_bare_integer("-1"));
    }
}
