use crate::config::Config;
use crate::models::auth::{Session, UserProfile};
use gloo_storage::Storage;
use std::cell::RefCell;

/// Where the session credential lives between login and logout.
///
/// The API client reads the token on every request and is the only writer
/// besides login/logout, so implementations need no locking: everything runs
/// on the single UI thread.
pub trait SessionStore {
    fn token(&self) -> Option<String>;

    fn user(&self) -> Option<UserProfile>;

    fn save(&self, session: &Session);

    /// Removes token and profile together.
    fn clear(&self);

    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// Session persisted in the browser's `localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSession;

impl SessionStore for BrowserSession {
    fn token(&self) -> Option<String> {
        gloo_storage::LocalStorage::get::<String>(Config::TOKEN_KEY)
            .ok()
            .filter(|t| !t.is_empty())
    }

    fn user(&self) -> Option<UserProfile> {
        gloo_storage::LocalStorage::get(Config::USER_KEY).ok()
    }

    fn save(&self, session: &Session) {
        if let Err(e) = gloo_storage::LocalStorage::set(Config::TOKEN_KEY, &session.token) {
            log::warn!("Failed to save token: {e:?}");
        }
        if let Err(e) = gloo_storage::LocalStorage::set(Config::USER_KEY, &session.user) {
            log::warn!("Failed to save user profile: {e:?}");
        }
    }

    fn clear(&self) {
        gloo_storage::LocalStorage::delete(Config::TOKEN_KEY);
        gloo_storage::LocalStorage::delete(Config::USER_KEY);
    }
}

/// In-memory session, used off the browser and in tests.
#[derive(Debug, Default)]
pub struct MemorySession {
    inner: RefCell<Option<Session>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: RefCell::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySession {
    fn token(&self) -> Option<String> {
        self.inner
            .borrow()
            .as_ref()
            .map(|s| s.token.clone())
            .filter(|t| !t.is_empty())
    }

    fn user(&self) -> Option<UserProfile> {
        self.inner.borrow().as_ref().map(|s| s.user.clone())
    }

    fn save(&self, session: &Session) {
        *self.inner.borrow_mut() = Some(session.clone());
    }

    fn clear(&self) {
        self.inner.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;

    #[test]
    fn memory_session_clears_token_and_user_together() {
        let store = MemorySession::with_session(Session {
            token: "abc".to_string(),
            user: UserProfile {
                username: "alice".to_string(),
                role: Role::Viewer,
            },
        });
        assert!(store.is_authenticated());
        assert_eq!(store.user().unwrap().username, "alice");

        store.clear();
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
    }

    #[test]
    fn memory_session_treats_empty_token_as_signed_out() {
        let store = MemorySession::with_session(Session {
            token: String::new(),
            user: UserProfile {
                username: "alice".to_string(),
                role: Role::Viewer,
            },
        });
        assert_eq!(store.token(), None);
        assert!(!store.is_authenticated());
    }
}
