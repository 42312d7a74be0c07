use chrono::{DateTime, Duration, Utc};

use crate::core::config::Settings;
use crate::core::error::{ConfigError, Error};
use crate::token::{Claims, IssuedToken, RefreshPolicy, RefreshState, TokenIssuer, TokenValidator};

/// Owns the signing secret (through the issuer and validator keys) and the
/// token lifetimes. Built once at startup and shared read-only.
#[derive(Debug)]
pub(crate) struct TokenController {
    issuer: TokenIssuer,
    validator: TokenValidator,
    policy: RefreshPolicy,
    session_ttl: Duration,
}

impl TokenController {
    pub(crate) fn new(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self {
            issuer: TokenIssuer::new(settings.secret.as_bytes()),
            validator: TokenValidator::new(settings.secret.as_bytes()),
            policy: RefreshPolicy::new(settings.refresh_threshold, settings.refresh_ttl)?,
            session_ttl: settings.session_ttl,
        })
    }

    /// Token handed out after a successful login.
    pub(crate) fn login(&self, username: &str) -> Result<IssuedToken, Error> {
        Ok(self.issuer.issue(username, self.session_ttl)?)
    }

    pub(crate) fn validate(&self, token: &str) -> Result<Claims, Error> {
        Ok(self.validator.validate(token)?)
    }

    pub(crate) fn refresh(&self, claims: &Claims) -> Result<IssuedToken, Error> {
        self.refresh_at(claims, Utc::now())
    }

    pub(crate) fn refresh_at(&self, claims: &Claims, now: DateTime<Utc>) -> Result<IssuedToken, Error> {
        match self.policy.evaluate(claims, now) {
            RefreshState::NotYetRefreshable { remaining } => {
                tracing::debug!(
                    user = %claims.username,
                    remaining = remaining.num_seconds(),
                    "refresh requested too early"
                );

                Err(Error::TokenStillValid {
                    threshold_secs: self.policy.threshold().num_seconds(),
                })
            }
            RefreshState::RefreshWindow { remaining } => {
                tracing::debug!(
                    user = %claims.username,
                    remaining = remaining.num_seconds(),
                    "token inside refresh window"
                );

                Ok(self.issuer.issue_at(&claims.username, self.policy.ttl(), now)?)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn issue(&self, username: &str, ttl: Duration) -> Result<IssuedToken, Error> {
        Ok(self.issuer.issue(username, ttl)?)
    }
}
