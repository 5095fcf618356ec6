//! HS256 JSON Web Token codec implementing `AccessTokenCodec`.
//!
//! Tokens carry `sub` (user id as a decimal string), `role`, `iat`, `exp`,
//! and `iss`. Expiry is checked without leeway.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{AccessTokenCodec, TokenError};
use crate::domain::{Role, TokenClaims, UserId};

/// Issuer written into and required from every token.
pub const TOKEN_ISSUER: &str = "careplus";

#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
    iss: String,
}

/// Signs and verifies bearer tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenCodec {
    /// Build a codec from the signing secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl std::fmt::Debug for JwtTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenCodec").finish_non_exhaustive()
    }
}

fn timestamp(secs: i64, claim: &str) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| TokenError::invalid(format!("{claim} out of range")))
}

impl AccessTokenCodec for JwtTokenCodec {
    fn issue(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let jwt = JwtClaims {
            sub: claims.subject.to_string(),
            role: claims.role.as_str().to_owned(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
            iss: TOKEN_ISSUER.to_owned(),
        };
        encode(&Header::new(Algorithm::HS256), &jwt, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<JwtClaims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::invalid(err.to_string()),
            }
        })?;
        let jwt = data.claims;

        let subject = jwt
            .sub
            .parse::<i32>()
            .map_err(|_| TokenError::invalid("subject is not a user id"))
            .and_then(|raw| {
                UserId::new(raw).map_err(|err| TokenError::invalid(err.to_string()))
            })?;
        let role = jwt
            .role
            .parse::<Role>()
            .map_err(|err| TokenError::invalid(err.to_string()))?;

        Ok(TokenClaims {
            subject,
            role,
            issued_at: timestamp(jwt.iat, "iat")?,
            expires_at: timestamp(jwt.exp, "exp")?,
        })
    }
}
