//! One-time-password cache for the password-reset flow.
//!
//! Six-digit numeric codes keyed by user id, 600-second expiry, single use:
//! a successful confirm deletes the entry, so replaying the same code fails.
//! This cache is the only long-lived in-process state beside the store.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use super::domain::UserId;

/// Seconds a reset code stays valid when no TTL is configured.
pub const DEFAULT_OTP_TTL_SECONDS: i64 = 600;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OtpError {
    #[error("no pending code for this user")]
    Missing,
    #[error("code has expired")]
    Expired,
    #[error("code does not match")]
    Mismatch,
}

struct OtpEntry {
    code: String,
    expires_at: DateTime<Utc>,
}

pub struct OtpCache {
    ttl: Duration,
    entries: Mutex<HashMap<UserId, OtpEntry>>,
}

impl Default for OtpCache {
    fn default() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_OTP_TTL_SECONDS))
    }
}

impl OtpCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generate, store, and return a fresh six-digit code. A pending code
    /// for the same user is replaced.
    pub fn issue(&self, user_id: UserId) -> String {
        let mut rng = rand::rng();
        let code = format!("{:06}", rng.random_range(0..1_000_000u32));
        let entry = OtpEntry {
            code: code.clone(),
            expires_at: Utc::now() + self.ttl,
        };
        self.entries
            .lock()
            .expect("otp mutex poisoned")
            .insert(user_id, entry);
        code
    }

    /// Validate and consume a code. Deleted on success; a mismatched code
    /// leaves the pending entry in place so the user can retry.
    pub fn consume(&self, user_id: UserId, code: &str) -> Result<(), OtpError> {
        let mut entries = self.entries.lock().expect("otp mutex poisoned");
        let entry = entries.get(&user_id).ok_or(OtpError::Missing)?;

        if entry.expires_at < Utc::now() {
            entries.remove(&user_id);
            return Err(OtpError::Expired);
        }
        if entry.code != code {
            return Err(OtpError::Mismatch);
        }

        entries.remove(&user_id);
        Ok(())
    }
}
