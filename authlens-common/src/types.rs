use chrono::{DateTime, Utc};
use serde::Serialize;

/// A user account from the `users` table of the loaded snapshot.
///
/// `high_risk` is never stored; the classifier fills it in from the
/// failed-attempt threshold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub failed_attempts: i64,
    pub locked: bool,
    /// Opaque display text, never parsed.
    pub created_at: String,
    pub high_risk: bool,
}

/// A login event from the `login_events` table. A NULL reason normalizes
/// to the empty string on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginEvent {
    /// May reference no current account at all (deleted or renamed user);
    /// matching against accounts is case-insensitive.
    pub username: String,
    pub success: bool,
    pub mode: String,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
    pub high_risk: bool,
}
