use authlens_common::{LoginEvent, UserAccount};

/// In-memory holder of the currently loaded snapshot. The single source
/// of truth for both collections; callers render from references into it
/// rather than keeping their own copies.
#[derive(Debug, Default)]
pub struct RecordStore {
    users: Vec<UserAccount>,
    events: Vec<LoginEvent>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces both collections with a freshly loaded snapshot. Event
    /// order is whatever the load produced (newest first); the store
    /// never re-sorts.
    pub fn load(&mut self, users: Vec<UserAccount>, events: Vec<LoginEvent>) {
        self.users = users;
        self.events = events;
    }

    pub fn users(&self) -> &[UserAccount] {
        &self.users
    }

    pub fn events(&self) -> &[LoginEvent] {
        &self.events
    }

    /// Swaps in an updated user by id, keeping everyone else in place.
    /// An unknown id is a no-op.
    pub fn replace_user(&mut self, updated: UserAccount) {
        if let Some(slot) = self.users.iter_mut().find(|u| u.id == updated.id) {
            *slot = updated;
        }
    }
}
