//! Administrative elevation as an explicit capability.
//!
//! Mutating operations on stored reports and reference data take an
//! [`AdminGrant`]. A grant can only be obtained from [`AdminGate::unlock`],
//! so holding one is proof that the configured access code was presented.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors returned when admin elevation is refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AdminAccessError {
    /// No access code is configured for this process.
    #[error("admin access is not configured")]
    NotConfigured,
    /// The presented code does not match the configured code.
    #[error("invalid admin access code")]
    InvalidCode,
}

/// Capability proving admin elevation for the current operation.
#[derive(Debug)]
pub struct AdminGrant {
    _sealed: (),
}

/// Verifies admin access codes against the configured secret.
///
/// Only the SHA-256 digest of the configured code is retained.
#[derive(Clone)]
pub struct AdminGate {
    digest: Option<Vec<u8>>,
}

impl AdminGate {
    /// Creates a gate for the configured access code.
    ///
    /// A missing or blank code produces a gate that refuses every request.
    #[must_use]
    pub fn new(access_code: Option<&str>) -> Self {
        let digest = access_code
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(digest_code);
        Self { digest }
    }

    /// Returns `true` when an access code is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.digest.is_some()
    }

    /// Exchanges a presented access code for an [`AdminGrant`].
    ///
    /// # Errors
    ///
    /// Returns [`AdminAccessError::NotConfigured`] when no code is configured
    /// and [`AdminAccessError::InvalidCode`] when the code does not match.
    pub fn unlock(&self, presented: &str) -> Result<AdminGrant, AdminAccessError> {
        let expected = self
            .digest
            .as_deref()
            .ok_or(AdminAccessError::NotConfigured)?;
        let actual = digest_code(presented.trim());
        if !digests_match(expected, &actual) {
            tracing::warn!("admin unlock refused");
            return Err(AdminAccessError::InvalidCode);
        }
        Ok(AdminGrant { _sealed: () })
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}

fn digest_code(code: &str) -> Vec<u8> {
    Sha256::digest(code.as_bytes()).to_vec()
}

fn digests_match(expected: &[u8], actual: &[u8]) -> bool {
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .fold(0_u8, |acc, (left, right)| acc | (left ^ right))
            == 0
}
