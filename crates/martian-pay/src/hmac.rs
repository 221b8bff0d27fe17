use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::{Choice, ConstantTimeEq};

use crate::constants::SIGNATURE_LEN;

type HmacSha256 = Hmac<Sha256>;

/// A raw HMAC-SHA256 digest. Rendered as lowercase hex on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Decode a hex digest. Returns `None` for invalid hex or a digest of the wrong length.
    pub fn from_hex(s: &str) -> Option<Self> {
        let mut bytes = [0u8; SIGNATURE_LEN];
        hex::decode_to_slice(s, &mut bytes).ok()?;
        Some(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }
}

impl ConstantTimeEq for Signature {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// The exact bytes fed to the MAC: `<timestamp>.<payload>`.
pub fn signing_input(timestamp: i64, payload: &[u8]) -> Vec<u8> {
    let ts = timestamp.to_string();
    let mut input = Vec::with_capacity(ts.len() + 1 + payload.len());
    input.extend_from_slice(ts.as_bytes());
    input.push(b'.');
    input.extend_from_slice(payload);
    input
}

/// Compute HMAC-SHA256 over the signing input for `timestamp` and the raw `payload`.
pub fn compute_signature(secret: &[u8], timestamp: i64, payload: &[u8]) -> Signature {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Signature(mac.finalize().into_bytes().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_input_layout() {
        assert_eq!(signing_input(1700000000, b"{}"), b"1700000000.{}".to_vec());
        assert_eq!(signing_input(0, b""), b"0.".to_vec());
    }

    #[test]
    fn test_signature_matches_mac_over_signing_input() {
        let secret = b"whsec_test";
        let payload = br#"{"id":"evt_1"}"#;

        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(&signing_input(42, payload));
        let direct: [u8; 32] = mac.finalize().into_bytes().into();

        assert_eq!(compute_signature(secret, 42, payload).as_bytes(), &direct);
    }

    #[test]
    fn test_known_vector() {
        let sig = compute_signature(b"key", 1, b"The quick brown fox jumps over the lazy dog");
        assert_eq!(
            sig.to_hex(),
            "3ff4d3cc115b639a16dc5b217aa5c89be41d1e4b54efc356d63d0cd2a65b30f1"
        );
    }

    #[test]
    fn test_timestamp_is_part_of_the_mac() {
        let a = compute_signature(b"secret", 1700000000, b"body");
        let b = compute_signature(b"secret", 1700000001, b"body");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_roundtrip() {
        let sig = compute_signature(b"secret", 7, b"body");
        assert_eq!(Signature::from_hex(&sig.to_hex()), Some(sig));
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(Signature::from_hex("abc").is_none());
        assert!(Signature::from_hex("zz").is_none());
        assert!(Signature::from_hex(&"ab".repeat(16)).is_none());
        assert!(Signature::from_hex(&"ab".repeat(33)).is_none());
        assert!(Signature::from_hex("").is_none());
    }

    #[test]
    fn test_constant_time_eq() {
        let a = compute_signature(b"secret", 7, b"body");
        let b = compute_signature(b"other", 7, b"body");
        assert!(bool::from(a.ct_eq(&a)));
        assert!(!bool::from(a.ct_eq(&b)));
    }
}
