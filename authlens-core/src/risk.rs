//! Pure risk classification. Every function here is total over its
//! inputs and free of side effects; empty collections yield zero counts.

use std::collections::HashSet;

use authlens_common::{LoginEvent, RiskConfig, UserAccount};

/// Reason written onto events that classify as suspicious.
pub const SUSPICIOUS_REASON: &str = "sql_injection_possible";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserTotals {
    pub total: usize,
    pub locked: usize,
}

pub fn is_high_risk_user(user: &UserAccount, config: &RiskConfig) -> bool {
    user.failed_attempts >= config.failed_attempt_threshold
}

/// Lowercased usernames of the loaded accounts, the join key for event
/// classification. The schema does not guarantee username uniqueness;
/// duplicates simply collapse into the set.
pub fn known_usernames(users: &[UserAccount]) -> HashSet<String> {
    users.iter().map(|u| u.username.to_lowercase()).collect()
}

/// An event is suspicious when its username references no current
/// account (orphaned or spoofed identity), or when its reason text
/// contains any configured attack-pattern substring. Both sides of the
/// substring check are case-folded.
pub fn is_suspicious_event(
    event: &LoginEvent,
    known: &HashSet<String>,
    config: &RiskConfig,
) -> bool {
    if !known.contains(&event.username.to_lowercase()) {
        return true;
    }
    let reason = event.reason.to_lowercase();
    config
        .suspicious_patterns
        .iter()
        .any(|pattern| reason.contains(&pattern.to_lowercase()))
}

/// Returns a new event with the reason rewritten and the flag set when
/// classification is positive; otherwise the event passes through
/// unchanged. `username`, `success`, `mode` and `occurred_at` are never
/// touched.
pub fn annotate_suspicious(
    event: LoginEvent,
    known: &HashSet<String>,
    config: &RiskConfig,
) -> LoginEvent {
    if is_suspicious_event(&event, known, config) {
        LoginEvent {
            reason: SUSPICIOUS_REASON.to_owned(),
            high_risk: true,
            ..event
        }
    } else {
        event
    }
}

pub fn count_totals(users: &[UserAccount]) -> UserTotals {
    UserTotals {
        total: users.len(),
        locked: users.iter().filter(|u| u.locked).count(),
    }
}

pub fn count_high_risk_users(users: &[UserAccount], config: &RiskConfig) -> usize {
    users.iter().filter(|u| is_high_risk_user(u, config)).count()
}

/// Counts suspicious events over exactly the slice it is given, so a
/// filtered view recounts against what is visible rather than reading a
/// stale global figure.
pub fn count_suspicious_logins(
    events: &[LoginEvent],
    known: &HashSet<String>,
    config: &RiskConfig,
) -> usize {
    events
        .iter()
        .filter(|ev| is_suspicious_event(ev, known, config))
        .count()
}
