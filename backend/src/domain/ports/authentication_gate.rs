//! Driving port resolving bearer tokens into callers.
//!
//! Inbound adapters hand over the raw token; the gate verifies it and
//! re-reads the account so role changes and deletions take effect
//! immediately rather than at token expiry.

use async_trait::async_trait;

use crate::domain::{Caller, Error};

/// Verifies bearer tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthenticationGate: Send + Sync {
    /// Resolve a bearer token into the current caller.
    async fn authenticate(&self, bearer_token: &str) -> Result<Caller, Error>;
}
