//! Constant-time comparison helpers.
//!
//! Everything here goes through the `subtle` crate so that timing does not
//! reveal where two secrets first differ.

use sha2::{Digest, Sha256};
use subtle::{Choice, ConstantTimeEq};

use crate::hmac::Signature;

/// Constant-time byte comparison that does not leak input lengths or content.
///
/// Both inputs are hashed to fixed-length SHA-256 digests before comparison,
/// so timing reveals neither the content nor the length of either input.
/// Used for bearer tokens, whose length is not fixed.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let ha = Sha256::digest(a);
    let hb = Sha256::digest(b);
    ha.ct_eq(&hb).into()
}

/// Returns true if any candidate equals `expected`.
///
/// Every candidate is compared; matches are OR-ed into a `Choice` so neither
/// the position of the first differing byte nor the index of the matching
/// candidate affects the running time.
pub fn signature_matches_any(expected: &Signature, candidates: &[Signature]) -> bool {
    let matched = candidates
        .iter()
        .fold(Choice::from(0), |acc, candidate| acc | expected.ct_eq(candidate));
    matched.into()
}
