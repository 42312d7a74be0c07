use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};

use crate::token::{Claims, TokenError};

/// A signed token together with the claims it was signed over.
#[derive(Clone, Debug)]
pub(crate) struct IssuedToken {
    pub(crate) token: String,
    pub(crate) claims: Claims,
}

#[derive(Clone)]
pub(crate) struct TokenIssuer {
    header: Header,
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("alg", &self.header.alg)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub(crate) fn new(secret: &[u8]) -> Self {
        Self {
            header: Header::new(Algorithm::HS256),
            encoding_key: EncodingKey::from_secret(secret),
        }
    }

    /// Signs a token for `username` expiring `ttl` from now. The caller is
    /// trusted to have authenticated the subject.
    pub(crate) fn issue(&self, username: &str, ttl: Duration) -> Result<IssuedToken, TokenError> {
        self.issue_at(username, ttl, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        username: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        if username.is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?
            .timestamp();

        let claims = Claims {
            username: username.to_owned(),
            expires_at,
        };

        let token = jsonwebtoken::encode(&self.header, &claims, &self.encoding_key)
            .map_err(TokenError::Signing)?;

        tracing::debug!(username, expires_at, "issued token");

        Ok(IssuedToken { token, claims })
    }
}
