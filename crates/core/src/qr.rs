//! QR payload grammar and opaque entry-token generation.
//!
//! Payload shape: `smartqueue://scan/{location_id}/{entry|exit}/{token}`.
//! Parsing rejects anything that does not match this exact shape; the token
//! comparison against the stored entry code happens at the handler level
//! (case-sensitive, exact match).
//!
//! Tokens only need a low collision probability across printed codes, so a
//! timestamp plus a short random suffix is sufficient.

use std::sync::LazyLock;

use rand::distr::Alphanumeric;
use rand::Rng;
use regex::Regex;

use crate::error::CoreError;
use crate::types::LocationId;

/// URI scheme embedded in every printed QR code.
pub const QR_SCHEME: &str = "smartqueue";

/// Length of the random suffix in generated tokens.
const TOKEN_SUFFIX_LEN: usize = 9;

static SCAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^smartqueue://scan/([^/]+)/(entry|exit)/([^/]+)$").expect("valid scan regex")
});

/// Direction encoded in a scanned payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanAction {
    Entry,
    Exit,
}

/// A successfully parsed scan payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPayload {
    pub location_id: LocationId,
    pub action: ScanAction,
    pub token: String,
}

/// Parse a raw scanned string into a [`ScanPayload`].
///
/// Fails with [`CoreError::InvalidFormat`] unless the string matches the
/// grammar exactly (scheme, `scan` segment, action segment, token).
pub fn parse_scan_payload(raw: &str) -> Result<ScanPayload, CoreError> {
    let captures = SCAN_RE.captures(raw).ok_or(CoreError::InvalidFormat)?;

    let action = match &captures[2] {
        "entry" => ScanAction::Entry,
        "exit" => ScanAction::Exit,
        // The regex only admits the two literals above.
        _ => return Err(CoreError::InvalidFormat),
    };

    Ok(ScanPayload {
        location_id: captures[1].to_string(),
        action,
        token: captures[3].to_string(),
    })
}

/// Generate a fresh opaque entry token: `smartqueue-{millis}-{random}`.
pub fn generate_qr_token() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{QR_SCHEME}-{millis}-{}", suffix.to_lowercase())
}

/// Build the scannable entry payload for a location's current token.
pub fn entry_payload(location_id: &str, token: &str) -> String {
    format!("{QR_SCHEME}://scan/{location_id}/entry/{token}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_entry_payload() {
        let payload = parse_scan_payload("smartqueue://scan/loc-1/entry/abc123")
            .expect("well-formed payload should parse");
        assert_eq!(payload.location_id, "loc-1");
        assert_eq!(payload.action, ScanAction::Entry);
        assert_eq!(payload.token, "abc123");
    }

    #[test]
    fn parses_exit_payload() {
        let payload = parse_scan_payload("smartqueue://scan/main-canteen/exit/tok")
            .expect("exit payloads parse even though the app-exit flow rejects them");
        assert_eq!(payload.action, ScanAction::Exit);
    }

    #[test]
    fn missing_action_segment_is_invalid() {
        let result = parse_scan_payload("smartqueue://scan/loc-1/abc123");
        assert_matches!(result, Err(CoreError::InvalidFormat));
    }

    #[test]
    fn rejects_malformed_strings() {
        for raw in [
            "",
            "smartqueue://scan/loc-1/entry/",
            "smartqueue://scan//entry/abc",
            "smartqueue://scan/loc-1/enter/abc",
            "otherapp://scan/loc-1/entry/abc",
            "smartqueue://scan/loc-1/entry/abc/extra",
            "prefix smartqueue://scan/loc-1/entry/abc",
        ] {
            assert_matches!(
                parse_scan_payload(raw),
                Err(CoreError::InvalidFormat),
                "should reject {raw:?}"
            );
        }
    }

    #[test]
    fn generated_tokens_are_unique_and_well_formed() {
        let a = generate_qr_token();
        let b = generate_qr_token();
        assert_ne!(a, b);
        assert!(a.starts_with("smartqueue-"));
        let suffix = a.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), TOKEN_SUFFIX_LEN);
    }

    #[test]
    fn entry_payload_round_trips_through_the_parser() {
        let token = generate_qr_token();
        let payload = entry_payload("library-cafe", &token);
        let parsed = parse_scan_payload(&payload).expect("generated payload must parse");
        assert_eq!(parsed.location_id, "library-cafe");
        assert_eq!(parsed.token, token);
        assert_eq!(parsed.action, ScanAction::Entry);
    }
}
