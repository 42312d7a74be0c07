use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::token::{Claims, TokenError};

/// Checks structure and signature of a presented token.
///
/// Expiry is deliberately not enforced here: a correctly signed but expired
/// token still yields its claims, and callers that need "strictly unexpired"
/// compare `Claims::expires_at` themselves.
#[derive(Clone)]
pub(crate) struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl TokenValidator {
    pub(crate) fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub(crate) fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        match jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(token_data) => Ok(token_data.claims),
            Err(e) => match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    Err(TokenError::InvalidSignature)
                }
                _ => Err(TokenError::Malformed(e)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenIssuer;
    use chrono::{Duration, Utc};

    const SECRET: &[u8] = b"test-secret-key-12345";

    #[test]
    fn test_round_trip() {
        let issuer = TokenIssuer::new(SECRET);
        let validator = TokenValidator::new(SECRET);

        for (username, ttl) in [
            ("alice", Duration::seconds(30)),
            ("bob", Duration::minutes(5)),
            ("carol with spaces", Duration::hours(1)),
        ] {
            let before = Utc::now().timestamp();
            let issued = issuer.issue(username, ttl).unwrap();
            let after = Utc::now().timestamp();

            let claims = validator.validate(&issued.token).unwrap();

            assert_eq!(claims.username, username);
            assert!(claims.expires_at >= before + ttl.num_seconds());
            assert!(claims.expires_at <= after + ttl.num_seconds());
        }
    }

    #[test]
    fn test_expired_token_still_yields_claims() {
        let issuer = TokenIssuer::new(SECRET);
        let validator = TokenValidator::new(SECRET);

        let issued = issuer.issue("alice", Duration::seconds(-600)).unwrap();
        let claims = validator.validate(&issued.token).unwrap();

        assert_eq!(claims, issued.claims);
        assert!(claims.expires_at < Utc::now().timestamp());
    }

    #[test]
    fn test_different_secret_rejected() {
        let issued = TokenIssuer::new(b"secret1")
            .issue("alice", Duration::seconds(60))
            .unwrap();

        assert!(matches!(
            TokenValidator::new(b"secret2").validate(&issued.token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_tampered_bytes_rejected() {
        let issued = TokenIssuer::new(SECRET)
            .issue("alice", Duration::seconds(60))
            .unwrap();
        let validator = TokenValidator::new(SECRET);

        let header_len = issued.token.find('.').unwrap();

        // Every byte of the payload and signature segments.
        for i in header_len + 1..issued.token.len() {
            let mut bytes = issued.token.clone().into_bytes();
            if bytes[i] == b'.' {
                continue;
            }
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();

            match validator.validate(&tampered) {
                Err(TokenError::InvalidSignature) | Err(TokenError::Malformed(_)) => (),
                other => panic!("byte {i} tampered but got {other:?}"),
            }
        }
    }

    #[test]
    fn test_malformed_tokens() {
        let validator = TokenValidator::new(SECRET);

        for token in ["", "garbage", "invalid.token.here", "a.b"] {
            assert!(
                matches!(validator.validate(token), Err(TokenError::Malformed(_))),
                "{token:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let claims = Claims {
            username: "alice".into(),
            expires_at: Utc::now().timestamp() + 60,
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(Algorithm::HS512),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            TokenValidator::new(SECRET).validate(&token),
            Err(TokenError::InvalidSignature)
        ));
    }
}
