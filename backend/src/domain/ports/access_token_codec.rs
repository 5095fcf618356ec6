//! Port for signing and verifying bearer tokens.

use crate::domain::TokenClaims;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token codecs.
    pub enum TokenError {
        /// The token was well formed but past its expiry.
        Expired => "token expired",
        /// The token was malformed, badly signed, or carried bad claims.
        Invalid { message: String } => "invalid token: {message}",
        /// A token could not be produced.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Encodes [`TokenClaims`] into an opaque bearer token and back.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokenCodec: Send + Sync {
    /// Sign claims into a token string.
    fn issue(&self, claims: &TokenClaims) -> Result<String, TokenError>;

    /// Verify a token's signature and expiry and return its claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
