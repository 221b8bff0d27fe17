use std::fmt;
use std::str::FromStr;

use crate::constants::{SIGNATURE_SCHEME_V1, TIMESTAMP_KEY};
use crate::error::WebhookError;
use crate::hmac::Signature;

/// Parsed `Martian-Pay-Signature` header: `t=<unix>,v1=<hex>[,v1=<hex>...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeader {
    pub timestamp: i64,
    pub signatures: Vec<Signature>,
}

impl SignedHeader {
    pub fn new(timestamp: i64, signature: Signature) -> Self {
        Self {
            timestamp,
            signatures: vec![signature],
        }
    }

    /// Append another `v1` entry (e.g. the same payload signed with a second secret).
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signatures.push(signature);
        self
    }

    /// Parse a header value.
    ///
    /// `t` must appear exactly once. `v1` entries that are not 32-byte hex
    /// digests are skipped, and unknown keys are ignored so that new schemes
    /// can be published alongside `v1`.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        if header.trim().is_empty() {
            return Err(WebhookError::NotSigned);
        }

        let mut timestamp = None;
        let mut signatures = Vec::new();

        for pair in header.split(',') {
            let pair = pair.trim();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| WebhookError::InvalidHeader(format!("malformed pair {pair:?}")))?;

            match key.trim() {
                TIMESTAMP_KEY => {
                    if timestamp.is_some() {
                        return Err(WebhookError::InvalidHeader(
                            "duplicate timestamp".to_string(),
                        ));
                    }
                    timestamp = Some(parse_timestamp(value.trim())?);
                }
                SIGNATURE_SCHEME_V1 => {
                    if let Some(sig) = Signature::from_hex(value.trim()) {
                        signatures.push(sig);
                    }
                }
                _ => {}
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| WebhookError::InvalidHeader("missing timestamp".to_string()))?;

        if signatures.is_empty() {
            return Err(WebhookError::NoValidSignature);
        }

        Ok(Self {
            timestamp,
            signatures,
        })
    }
}

/// Plain decimal digits only, with no sign.
fn parse_timestamp(value: &str) -> Result<i64, WebhookError> {
    let invalid = || WebhookError::InvalidHeader(format!("invalid timestamp {value:?}"));
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

impl FromStr for SignedHeader {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SignedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{TIMESTAMP_KEY}={}", self.timestamp)?;
        for sig in &self.signatures {
            write!(f, ",{SIGNATURE_SCHEME_V1}={sig}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hmac::compute_signature;

    fn sig(secret: &[u8]) -> Signature {
        compute_signature(secret, 1700000000, b"{}")
    }

    #[test]
    fn test_encode_single_signature() {
        let s = sig(b"secret");
        let header = SignedHeader::new(1700000000, s);
        assert_eq!(header.to_string(), format!("t=1700000000,v1={}", s.to_hex()));
    }

    #[test]
    fn test_parse_what_we_encode() {
        let header = SignedHeader::new(1700000000, sig(b"a")).with_signature(sig(b"b"));
        let parsed: SignedHeader = header.to_string().parse().unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_empty_header_is_not_signed() {
        assert!(matches!(SignedHeader::parse(""), Err(WebhookError::NotSigned)));
        assert!(matches!(SignedHeader::parse("   "), Err(WebhookError::NotSigned)));
    }

    #[test]
    fn test_missing_timestamp() {
        let err = SignedHeader::parse("v1=abc").unwrap_err();
        assert!(matches!(err, WebhookError::InvalidHeader(_)));
    }

    #[test]
    fn test_non_numeric_timestamp() {
        let header = format!("t=soon,v1={}", sig(b"a").to_hex());
        assert!(matches!(
            SignedHeader::parse(&header),
            Err(WebhookError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_negative_timestamp() {
        let header = format!("t=-5,v1={}", sig(b"a").to_hex());
        assert!(matches!(
            SignedHeader::parse(&header),
            Err(WebhookError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_signed_or_padded_timestamp_is_rejected() {
        for t in ["+5", "-0", "", "1e3", "0x10", "5 5", "99999999999999999999"] {
            let header = format!("t={t},v1={}", sig(b"a").to_hex());
            assert!(
                matches!(
                    SignedHeader::parse(&header),
                    Err(WebhookError::InvalidHeader(_))
                ),
                "t={t:?} should be rejected"
            );
        }
        let header = format!("t=0005,v1={}", sig(b"a").to_hex());
        assert_eq!(SignedHeader::parse(&header).unwrap().timestamp, 5);
    }

    #[test]
    fn test_duplicate_timestamp() {
        let header = format!("t=1,t=2,v1={}", sig(b"a").to_hex());
        assert!(matches!(
            SignedHeader::parse(&header),
            Err(WebhookError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_pair_without_equals() {
        let header = format!("t=1700000000,v1={},garbage", sig(b"a").to_hex());
        assert!(matches!(
            SignedHeader::parse(&header),
            Err(WebhookError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_undecodable_v1_entries_are_skipped() {
        let good = sig(b"a");
        let header = format!("t=1700000000,v1=nothex,v1={},v1=abcd", good.to_hex());
        let parsed = SignedHeader::parse(&header).unwrap();
        assert_eq!(parsed.signatures, vec![good]);
    }

    #[test]
    fn test_no_decodable_v1_is_no_valid_signature() {
        assert!(matches!(
            SignedHeader::parse("t=1700000000,v1=zz"),
            Err(WebhookError::NoValidSignature)
        ));
        assert!(matches!(
            SignedHeader::parse("t=1700000000"),
            Err(WebhookError::NoValidSignature)
        ));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let good = sig(b"a");
        let header = format!(
            "t=1700000000,v0=6ffbb59b2300aae63f272406069a9788598b792a944a07aba816edb039989a39,foo=bar,v1={}",
            good.to_hex()
        );
        let parsed = SignedHeader::parse(&header).unwrap();
        assert_eq!(parsed.timestamp, 1700000000);
        assert_eq!(parsed.signatures, vec![good]);
    }

    #[test]
    fn test_whitespace_around_pairs() {
        let good = sig(b"a");
        let header = format!(" t=1700000000 , v1={} ", good.to_hex());
        let parsed = SignedHeader::parse(&header).unwrap();
        assert_eq!(parsed.signatures.len(), 1);
    }
}
