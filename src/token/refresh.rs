use chrono::{DateTime, Duration, Utc};

use crate::core::error::ConfigError;
use crate::token::Claims;

/// Where a presented token sits relative to its refresh window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RefreshState {
    /// More than `threshold` left; too early to refresh.
    NotYetRefreshable { remaining: Duration },
    /// At most `threshold` left, possibly already expired.
    RefreshWindow { remaining: Duration },
}

/// Decides whether a validated token may be exchanged for a new one.
///
/// Evaluated fresh on every call from the presented claims alone; there is no
/// server-side record of earlier refreshes.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RefreshPolicy {
    threshold: Duration,
    ttl: Duration,
}

impl RefreshPolicy {
    /// `ttl` must exceed `threshold`, otherwise a reissued token could expire
    /// no later than the one it replaces.
    pub(crate) fn new(threshold: Duration, ttl: Duration) -> Result<Self, ConfigError> {
        if threshold < Duration::zero() || ttl <= threshold {
            return Err(ConfigError::Invalid(format!(
                "refresh ttl {}s must exceed threshold {}s",
                ttl.num_seconds(),
                threshold.num_seconds()
            )));
        }

        Ok(Self { threshold, ttl })
    }

    pub(crate) fn threshold(&self) -> Duration {
        self.threshold
    }

    pub(crate) fn ttl(&self) -> Duration {
        self.ttl
    }

    pub(crate) fn evaluate(&self, claims: &Claims, now: DateTime<Utc>) -> RefreshState {
        let remaining = claims.remaining(now);

        if remaining > self.threshold {
            RefreshState::NotYetRefreshable { remaining }
        } else {
            RefreshState::RefreshWindow { remaining }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_policy() -> RefreshPolicy {
        RefreshPolicy::new(Duration::seconds(30), Duration::minutes(5)).unwrap()
    }

    fn claims_expiring_in(now: DateTime<Utc>, secs: i64) -> Claims {
        Claims {
            username: "alice".into(),
            expires_at: now.timestamp() + secs,
        }
    }

    #[test]
    fn test_window_boundaries() {
        let policy = make_policy();
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        assert_eq!(
            policy.evaluate(&claims_expiring_in(now, 31), now),
            RefreshState::NotYetRefreshable {
                remaining: Duration::seconds(31)
            }
        );
        assert_eq!(
            policy.evaluate(&claims_expiring_in(now, 30), now),
            RefreshState::RefreshWindow {
                remaining: Duration::seconds(30)
            }
        );
        assert_eq!(
            policy.evaluate(&claims_expiring_in(now, 10), now),
            RefreshState::RefreshWindow {
                remaining: Duration::seconds(10)
            }
        );
    }

    #[test]
    fn test_expired_token_is_in_window() {
        let policy = make_policy();
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        assert_eq!(
            policy.evaluate(&claims_expiring_in(now, -3600), now),
            RefreshState::RefreshWindow {
                remaining: Duration::seconds(-3600)
            }
        );
    }

    #[test]
    fn test_sub_second_precision() {
        let policy = make_policy();
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = claims_expiring_in(now, 31);

        let later = now + Duration::milliseconds(1500);
        assert!(matches!(
            policy.evaluate(&claims, later),
            RefreshState::RefreshWindow { .. }
        ));
    }

    #[test]
    fn test_ttl_must_exceed_threshold() {
        assert!(RefreshPolicy::new(Duration::seconds(30), Duration::seconds(30)).is_err());
        assert!(RefreshPolicy::new(Duration::seconds(-1), Duration::seconds(30)).is_err());
        assert!(RefreshPolicy::new(Duration::zero(), Duration::seconds(1)).is_ok());
    }
}
