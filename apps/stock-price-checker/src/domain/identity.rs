//! Caller identity anonymization.
//!
//! Raw caller addresses never reach the like registry. They are replaced
//! by an unsalted SHA-256 digest, so the same address always maps to the
//! same token. The digest is not a secret: anyone holding a list of
//! candidate addresses can recover the original by hashing them.

use std::fmt;

use sha2::{Digest, Sha256};

/// Opaque identity derived from a caller address.
///
/// Always 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityToken(String);

impl IdentityToken {
    /// Get the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anonymize a raw caller address.
///
/// An empty address is hashed like any other value, so every caller
/// without a discoverable address shares one identity.
#[must_use]
pub fn anonymize(raw_address: &str) -> IdentityToken {
    let mut hasher = Sha256::new();
    hasher.update(raw_address.as_bytes());
    IdentityToken(format!("{:x}", hasher.finalize()))
}
