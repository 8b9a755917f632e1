//! Explicit session context.
//!
//! The embedding application creates one [`SessionContext`], calls
//! [`SessionContext::initialize`] once at start-up, and passes the context
//! to whatever needs the signed-in user. Nothing here is global.

use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

/// The signed-in user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionUser {
    pub id: String,
    pub user_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A bearer token and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

/// Persistence for the serialized session.
pub trait SessionStore {
    fn load(&self) -> Result<Option<String>, SessionError>;
    fn save(&self, data: &str) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// In-process store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with serialized data.
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(data.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, data: &str) -> Result<(), SessionError> {
        *self.slot.borrow_mut() = Some(data.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}

/// Holds the current session, backed by a store.
#[derive(Default)]
pub struct SessionContext {
    store: Option<Box<dyn SessionStore>>,
    session: Option<Session>,
}

impl SessionContext {
    /// An uninitialized, signed-out context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the store and restore any persisted session.
    ///
    /// A persisted session that no longer parses is discarded and the
    /// context starts signed out.
    pub fn initialize(&mut self, store: Box<dyn SessionStore>) -> Result<(), SessionError> {
        self.session = match store.load()? {
            Some(data) => match serde_json::from_str::<Session>(&data) {
                Ok(session) => {
                    debug!(user = %session.user.user_name, "restored session");
                    Some(session)
                }
                Err(e) => {
                    warn!(error = %e, "discarding corrupt persisted session");
                    store.clear()?;
                    None
                }
            },
            None => None,
        };
        self.store = Some(store);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.store.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Store a freshly issued session.
    pub fn sign_in(&mut self, session: Session) -> Result<(), SessionError> {
        let store = self.store.as_ref().ok_or(SessionError::Uninitialized)?;
        let data =
            serde_json::to_string(&session).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        store.save(&data)?;
        self.session = Some(session);
        Ok(())
    }

    /// Sign out: forget the session in memory and in the store.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.session = None;
        match &self.store {
            Some(store) => store.clear(),
            None => Ok(()),
        }
    }

    /// `Authorization` header value for the current session.
    pub fn bearer(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|s| format!("Bearer {}", s.token))
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("initialized", &self.is_initialized())
            .field("user", &self.session.as_ref().map(|s| &s.user.user_name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session {
            token: "t0k3n".into(),
            user: SessionUser {
                id: "42".into(),
                user_name: "admin".into(),
                roles: vec!["Admin".into()],
            },
        }
    }

    #[test]
    fn test_sign_in_persists_and_restores() {
        let store = MemoryStore::new();

        let mut context = SessionContext::new();
        context.initialize(Box::new(store.clone())).unwrap();
        assert!(!context.is_authenticated());
        context.sign_in(session()).unwrap();
        assert_eq!(context.bearer().as_deref(), Some("Bearer t0k3n"));
        assert!(store.contents().unwrap().contains("\"UserName\":\"admin\""));

        let mut restored = SessionContext::new();
        restored.initialize(Box::new(store)).unwrap();
        assert_eq!(restored.session(), Some(&session()));
    }

    #[test]
    fn test_clear_wipes_store() {
        let store = MemoryStore::new();
        let mut context = SessionContext::new();
        context.initialize(Box::new(store.clone())).unwrap();
        context.sign_in(session()).unwrap();

        context.clear().unwrap();
        assert!(!context.is_authenticated());
        assert_eq!(context.bearer(), None);
        assert_eq!(store.contents(), None);
    }

    #[test]
    fn test_corrupt_session_is_discarded() {
        let store = MemoryStore::with_data("{not json");
        let mut context = SessionContext::new();
        context.initialize(Box::new(store.clone())).unwrap();
        assert!(!context.is_authenticated());
        assert_eq!(store.contents(), None);
    }

    #[test]
    fn test_sign_in_requires_initialize() {
        let mut context = SessionContext::new();
        assert!(matches!(
            context.sign_in(session()),
            Err(SessionError::Uninitialized)
        ));
    }
}
