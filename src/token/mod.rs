//! Stateless session tokens: HS256 JWTs carrying a username and an expiry.
//!
//! Nothing here touches storage. The issuer and validator share one secret,
//! fixed at startup; the refresh policy only looks at the presented claims.

pub(crate) mod claims;
pub(crate) mod issuer;
pub(crate) mod refresh;
pub(crate) mod validator;

pub(crate) use claims::Claims;
pub(crate) use issuer::{IssuedToken, TokenIssuer};
pub(crate) use refresh::{RefreshPolicy, RefreshState};
pub(crate) use validator::TokenValidator;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Refusing to issue a token without a subject")]
    EmptySubject,
    #[error("Token expiry out of range")]
    ExpiryOutOfRange,
    #[error("Malformed token: {0}")]
    Malformed(jsonwebtoken::errors::Error),
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}
