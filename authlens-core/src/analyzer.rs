use std::path::{Path, PathBuf};

use authlens_common::{AuthlensError, LoginEvent, RiskConfig, UserAccount};
use serde::Serialize;
use tracing::*;

use crate::store::RecordStore;
use crate::{db, risk, view};

/// Headline counters for whatever subset is currently visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SecurityInsights {
    pub total_users: usize,
    pub locked_users: usize,
    /// Accounts at or over the failed-attempt threshold.
    pub high_risk_users: usize,
    /// Suspicious login events in the visible subset. This is the
    /// headline high-risk signal.
    pub suspicious_logins: usize,
}

/// The engine facade: owns the record store, the active search query and
/// the risk configuration, and remembers the backing path of the last
/// opened snapshot for the one supported write (unlocking a user).
///
/// Strictly sequential: each operation runs to completion and every
/// database handle is scoped to a single load or update.
pub struct Analyzer {
    config: RiskConfig,
    store: RecordStore,
    query: String,
    source: Option<PathBuf>,
}

impl Analyzer {
    pub fn new(config: RiskConfig) -> Self {
        Self {
            config,
            store: RecordStore::new(),
            query: String::new(),
            source: None,
        }
    }

    /// Loads a full snapshot from `path` over a scoped read-only
    /// connection. A snapshot without a `login_events` table loads with
    /// an empty event list (legacy schema); any other failure propagates
    /// and leaves the previously loaded snapshot in place. Events are
    /// annotated at load time so the stored collection already carries
    /// risk flags.
    pub async fn open(&mut self, path: &Path) -> Result<(), AuthlensError> {
        let db = db::open_read_only(path).await?;

        let users: Vec<UserAccount> = db::load_users(&db)
            .await?
            .into_iter()
            .map(|mut u| {
                u.high_risk = risk::is_high_risk_user(&u, &self.config);
                u
            })
            .collect();

        let events = match db::load_login_events(&db).await {
            Ok(events) => events,
            Err(AuthlensError::LegacySchemaGap) => {
                debug!(path = %path.display(), "snapshot has no login_events table, continuing without events");
                Vec::new()
            }
            Err(err) => return Err(err),
        };
        drop(db);

        let known = risk::known_usernames(&users);
        let events: Vec<LoginEvent> = events
            .into_iter()
            .map(|ev| risk::annotate_suspicious(ev, &known, &self.config))
            .collect();

        info!(
            path = %path.display(),
            users = users.len(),
            events = events.len(),
            "snapshot loaded (read-only)"
        );
        self.store.load(users, events);
        self.source = Some(path.to_path_buf());
        Ok(())
    }

    pub fn set_query(&mut self, text: &str) {
        self.query = text.to_owned();
    }

    /// The full user collection, unfiltered.
    pub fn users(&self) -> &[UserAccount] {
        self.store.users()
    }

    /// The full event collection, unfiltered.
    pub fn events(&self) -> &[LoginEvent] {
        self.store.events()
    }

    pub fn visible_users(&self) -> Vec<UserAccount> {
        view::filter_users(self.store.users(), &self.query)
    }

    pub fn visible_events(&self) -> Vec<LoginEvent> {
        view::filter_events(self.store.events(), &self.query)
    }

    /// Counters over the visible subset. Recomputed on every call rather
    /// than cached, so an active search always reports what is actually
    /// on screen. Username membership is still judged against the full
    /// account list.
    pub fn insights(&self) -> SecurityInsights {
        let users = self.visible_users();
        let events = self.visible_events();
        let known = risk::known_usernames(self.store.users());
        let totals = risk::count_totals(&users);
        SecurityInsights {
            total_users: totals.total,
            locked_users: totals.locked,
            high_risk_users: risk::count_high_risk_users(&users, &self.config),
            suspicious_logins: risk::count_suspicious_logins(&events, &known, &self.config),
        }
    }

    /// Unlocks a user by id: write-through against the opened snapshot
    /// over a separate writable handle, then reconciliation of the
    /// in-memory store once the write is confirmed. Unlocking an
    /// already-unlocked user is an idempotent success. Counters are not
    /// recomputed here; callers re-derive via [`Analyzer::insights`].
    pub async fn unlock_user(&mut self, id: i64) -> Result<(), AuthlensError> {
        let Some(path) = self.source.clone() else {
            return Err(AuthlensError::NoWritableSource);
        };

        let db = db::open_writable(&path).await?;
        let rows_affected = db::update_user_lock_state(&db, id, false).await?;
        drop(db);

        if rows_affected == 0 {
            return Err(AuthlensError::RecordNotFound(id));
        }

        let updated = self.store.users().iter().find(|u| u.id == id).cloned();
        if let Some(mut user) = updated {
            user.locked = false;
            self.store.replace_user(user);
        }
        info!(user_id = id, "user unlocked");
        Ok(())
    }
}
