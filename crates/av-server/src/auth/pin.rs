//! Shared PIN verification

use sha2::{Digest, Sha256};

/// Verifies candidate PINs against the configured one
///
/// Both sides are reduced to SHA-256 digests before comparison so the
/// comparison always runs over 32 bytes and leaks neither the PIN length nor
/// the position of the first mismatch.
#[derive(Clone)]
pub struct PinVerifier {
    digest: Option<[u8; 32]>,
}

impl PinVerifier {
    /// Verifier for `pin`; `None` or an empty PIN never verifies
    pub fn new(pin: Option<&str>) -> Self {
        let digest = pin.filter(|p| !p.is_empty()).map(digest);
        Self { digest }
    }

    /// Whether a PIN is configured at all
    pub fn is_configured(&self) -> bool {
        self.digest.is_some()
    }

    /// Check a candidate PIN in constant time
    pub fn verify(&self, candidate: &str) -> bool {
        match &self.digest {
            Some(expected) => constant_time_eq(&digest(candidate), expected),
            None => false,
        }
    }
}

impl std::fmt::Debug for PinVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinVerifier")
            .field("configured", &self.is_configured())
            .finish()
    }
}

fn digest(pin: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(pin.as_bytes()));
    out
}

/// Compare two byte strings without short-circuiting on the first difference
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_matching_pin() {
        let verifier = PinVerifier::new(Some("1234"));
        assert!(verifier.is_configured());
        assert!(verifier.verify("1234"));
        assert!(!verifier.verify("1235"));
        assert!(!verifier.verify("12345"));
        assert!(!verifier.verify(""));
    }

    #[test]
    fn test_unconfigured_never_verifies() {
        assert!(!PinVerifier::new(None).verify(""));
        let empty = PinVerifier::new(Some(""));
        assert!(!empty.is_configured());
        assert!(!empty.verify(""));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }

    #[test]
    fn test_debug_hides_digest() {
        let rendered = format!("{:?}", PinVerifier::new(Some("1234")));
        assert!(!rendered.contains("1234"));
        assert!(rendered.contains("configured: true"));
    }
}
