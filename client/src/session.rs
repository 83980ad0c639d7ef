//! Explicitly constructed session context.
//!
//! Holds the bearer token and the cached user profile in memory and mirrors
//! both into [`DurableStorage`] under the `jwt` and `user` keys. A `Session`
//! is a cheap handle; clones share the same state.

use std::sync::Arc;

use newsdesk_shared::User;
use parking_lot::RwLock;

use crate::storage::{DurableStorage, MemoryStorage, StorageError};

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "jwt";
/// Storage key of the serialized user profile.
pub const USER_KEY: &str = "user";

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

struct SessionInner {
    storage: Arc<dyn DurableStorage>,
    state: RwLock<SessionState>,
}

/// Shared authentication state: bearer token plus cached profile.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("Session")
            .field("authenticated", &state.token.is_some())
            .field("user", &state.user.as_ref().map(|user| user.username.as_str()))
            .finish()
    }
}

impl Session {
    /// Re-hydrate token and user from durable storage.
    pub fn restore(storage: Arc<dyn DurableStorage>) -> Self {
        let token = storage.get(TOKEN_KEY).filter(|token| !token.is_empty());
        let user = storage.get(USER_KEY).and_then(|raw| {
            serde_json::from_str::<User>(&raw)
                .map_err(|err| tracing::warn!("discarding unreadable cached user: {err}"))
                .ok()
        });
        tracing::debug!(has_token = token.is_some(), has_user = user.is_some(), "session restored");
        Self {
            inner: Arc::new(SessionInner {
                storage,
                state: RwLock::new(SessionState {
                    token,
                    user,
                }),
            }),
        }
    }

    /// Session backed by process-local storage only.
    pub fn in_memory() -> Self {
        Self::restore(Arc::new(MemoryStorage::new()))
    }

    /// Backing durable storage.
    pub fn storage(&self) -> &Arc<dyn DurableStorage> {
        &self.inner.storage
    }

    /// Token held in memory.
    pub fn token(&self) -> Option<String> {
        self.inner.state.read().token.clone()
    }

    /// Token as currently persisted, which is what outgoing requests carry.
    pub fn stored_token(&self) -> Option<String> {
        self.inner.storage.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// Cached profile of the signed-in user.
    pub fn user(&self) -> Option<User> {
        self.inner.state.read().user.clone()
    }

    /// Token presence alone; no expiry check.
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().token.is_some()
    }

    /// Store a fresh token and profile after login or registration.
    pub fn sign_in(&self, token: &str, user: User) {
        persist(self.inner.storage.set(TOKEN_KEY, token));
        self.persist_user(&user);
        let mut state = self.inner.state.write();
        state.token = Some(token.to_string());
        state.user = Some(user);
    }

    /// Replace the cached profile after a refresh.
    pub fn set_user(&self, user: User) {
        self.persist_user(&user);
        self.inner.state.write().user = Some(user);
    }

    /// Forget token and profile, in memory and in storage.
    pub fn clear(&self) {
        persist(self.inner.storage.remove(TOKEN_KEY));
        persist(self.inner.storage.remove(USER_KEY));
        let mut state = self.inner.state.write();
        state.token = None;
        state.user = None;
    }

    fn persist_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => persist(self.inner.storage.set(USER_KEY, &raw)),
            Err(err) => tracing::warn!("failed to serialize user for storage: {err}"),
        }
    }
}

// Storage failures never abort a session transition; the in-memory copy stays authoritative.
fn persist(result: Result<(), StorageError>) {
    if let Err(err) = result {
        tracing::warn!("session storage write failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use newsdesk_shared::{Role, User};

    use super::{Session, TOKEN_KEY, USER_KEY};
    use crate::storage::{DurableStorage, MemoryStorage};

    fn editor() -> User {
        User {
            id: Some(1),
            username: "ed".to_string(),
            email: "ed@example.com".to_string(),
            role: Some(Role::new("editor")),
        }
    }

    #[test]
    fn restore_rehydrates_token_and_user() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "t-1").expect("set");
        storage
            .set(USER_KEY, r#"{"id":1,"username":"ed","email":"ed@example.com","role":{"type":"editor"}}"#)
            .expect("set");

        let session = Session::restore(storage);
        assert!(session.is_authenticated());
        assert_eq!(session.user().map(|u| u.is_editor()), Some(true));
    }

    #[test]
    fn unreadable_user_is_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(USER_KEY, "{broken").expect("set");
        let session = Session::restore(storage);
        assert!(session.user().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn sign_in_then_clear_updates_both_copies() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::restore(storage.clone());

        session.sign_in("t-2", editor());
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("t-2"));
        assert!(storage.get(USER_KEY).is_some());

        session.clear();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert_eq!(session.stored_token(), None);
        assert_eq!(storage.get(USER_KEY), None);

        let reopened = Session::restore(storage);
        assert!(reopened.user().is_none());
        assert!(reopened.token().is_none());
    }
}
