use std::fmt;

use chrono::{DateTime, Utc};

/// Bearer token issued by the authorization endpoint.
///
/// ADM tokens carry an `expires_in`, but expiry is detected reactively through
/// a 401 from the delivery endpoint, so only the fetch instant is kept.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub obtained_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: String) -> Self {
        Self {
            value,
            obtained_at: Utc::now(),
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }

    /// Seconds since the token was obtained.
    pub fn age_seconds(&self) -> i64 {
        (Utc::now() - self.obtained_at).num_seconds()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}
