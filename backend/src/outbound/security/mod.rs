//! Credential adapters: bcrypt password hashing and HS256 bearer tokens.

mod bcrypt_password_hasher;
mod jwt_token_codec;

pub use bcrypt_password_hasher::BcryptPasswordHasher;
pub use jwt_token_codec::{JwtTokenCodec, TOKEN_ISSUER};
