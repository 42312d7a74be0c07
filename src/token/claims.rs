use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Username;

/// Payload of a session token. Only meaningful once its signature has been
/// checked by [`TokenValidator`](super::TokenValidator).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) username: Username,
    /// Unix seconds.
    #[serde(rename = "exp")]
    pub(crate) expires_at: i64,
}

impl Claims {
    /// Time left until expiry; negative once the token has expired.
    pub(crate) fn remaining(&self, now: DateTime<Utc>) -> Duration {
        match DateTime::from_timestamp(self.expires_at, 0) {
            Some(expiry) => expiry - now,
            None if self.expires_at > 0 => Duration::MAX,
            None => Duration::MIN,
        }
    }
}
