//! Query-driven view derivation. Filtering is pure and idempotent; the
//! record store is never touched, only the derived output changes.

use authlens_common::{LoginEvent, UserAccount};

/// Trims and case-folds the raw query text. An empty result means "no
/// filter".
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Keeps users whose username contains the normalized query. An empty
/// query yields the full collection in original order.
pub fn filter_users(users: &[UserAccount], query: &str) -> Vec<UserAccount> {
    let query = normalize_query(query);
    if query.is_empty() {
        return users.to_vec();
    }
    users
        .iter()
        .filter(|u| u.username.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Keeps events whose username or reason contains the normalized query.
/// An empty reason never matches the reason clause.
pub fn filter_events(events: &[LoginEvent], query: &str) -> Vec<LoginEvent> {
    let query = normalize_query(query);
    if query.is_empty() {
        return events.to_vec();
    }
    events
        .iter()
        .filter(|ev| {
            ev.username.to_lowercase().contains(&query)
                || (!ev.reason.is_empty() && ev.reason.to_lowercase().contains(&query))
        })
        .cloned()
        .collect()
}
