/*!
 * Session Tokens
 * Opaque bearer tokens with constant-time comparison
 */

use crate::core::limits::SESSION_TOKEN_BYTES;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;
use subtle::ConstantTimeEq;

/// Opaque bearer token for an audit session
///
/// Comparison is constant-time to avoid timing side-channels; `Debug`
/// never prints the token material.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh token from the OS entropy source
    pub fn generate() -> Self {
        let mut bytes = [0u8; SESSION_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let mut encoded = String::with_capacity(SESSION_TOKEN_BYTES * 2);
        for byte in bytes {
            // infallible for String
            let _ = write!(encoded, "{byte:02x}");
        }
        Self(encoded)
    }

    /// Constant-time comparison against a caller-supplied raw token
    ///
    /// Length mismatch returns early; only the token length is observable.
    pub fn matches(&self, raw: &str) -> bool {
        let ours = self.0.as_bytes();
        let theirs = raw.as_bytes();
        ours.len() == theirs.len() && bool::from(ours.ct_eq(theirs))
    }

    /// Token material, for handing to the audit party at issue time
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl PartialEq for SessionToken {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for SessionToken {}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(****)")
    }
}
