//! Persistent session scalars: the local-storage analogue.
//!
//! The store is an explicit, injectable key/value facade rather than an
//! ambient global, so tests substitute an in-memory instance. Entries have
//! no TTL and survive until [`SessionStore::clear`] at logout.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::SecretString;

/// Well-known session keys.
pub mod keys {
    /// Current username, written at login/signup.
    pub const USERNAME: &str = "username";

    /// Current password, written at login/signup.
    pub const PASSWORD: &str = "password";

    /// Last remote error class: `"401"` or `"other"`.
    pub const ERROR_STATUS: &str = "error_status";

    /// Username whose cart clear is still owed after a checkout (the
    /// compensating action for a failed post-order clear).
    pub const PENDING_CLEAR: &str = "pending_clear";

    /// Pending customization fields, used to reconstruct a draft across a
    /// full navigation.
    pub const KEYBOARD_ID: &str = "keyboard_id";
    pub const KEYBOARD_NAME: &str = "keyboard_name";
    pub const KEYBOARD_PRICE: &str = "keyboard_price";
    pub const KEYBOARD_QUANTITY: &str = "keyboard_quantity";
    pub const SIZE: &str = "size";
    pub const SWITCH_COLOR: &str = "switch_color";
}

/// Durable key/value scalars surviving restarts of the client process.
///
/// Cheaply cloneable; all clones share the same map. When opened with a
/// backing file every write is flushed to it as JSON, mirroring browser
/// local storage semantics.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
    path: Option<Arc<PathBuf>>,
}

impl SessionStore {
    /// An in-memory store (tests, or no `KEEBCRAFT_SESSION_FILE` configured).
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            path: None,
        }
    }

    /// Open a file-backed store, loading any previously saved scalars.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn open(path: PathBuf) -> std::io::Result<Self> {
        let map = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(std::io::Error::other)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            inner: Arc::new(RwLock::new(map)),
            path: Some(Arc::new(path)),
        })
    }

    /// Save a scalar.
    pub fn save(&self, key: &str, value: impl Into<String>) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(key.to_string(), value.into());
        self.flush(&map);
    }

    /// Read a scalar, `None` when absent.
    #[must_use]
    pub fn read(&self, key: &str) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Remove a single scalar.
    pub fn remove(&self, key: &str) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(key);
        self.flush(&map);
    }

    /// Remove all scalars (logout).
    pub fn clear(&self) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.clear();
        self.flush(&map);
    }

    fn flush(&self, map: &HashMap<String, String>) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        match serde_json::to_string(map) {
            Ok(raw) => {
                if let Err(e) = std::fs::write(path, raw) {
                    tracing::warn!("failed to persist session to {}: {e}", path.display());
                }
            }
            Err(e) => tracing::warn!("failed to encode session: {e}"),
        }
    }

    // =========================================================================
    // Typed helpers
    // =========================================================================

    /// The authenticated username, if any.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.read(keys::USERNAME).filter(|u| !u.is_empty())
    }

    /// The stored password, wrapped so it is not logged by accident.
    #[must_use]
    pub fn password(&self) -> Option<SecretString> {
        self.read(keys::PASSWORD).map(SecretString::from)
    }

    /// Record identity at login/signup.
    pub fn set_credentials(&self, username: &str, password: &str) {
        self.save(keys::USERNAME, username);
        self.save(keys::PASSWORD, password);
    }

    /// Last remote error class (`"401"` or `"other"`).
    #[must_use]
    pub fn error_status(&self) -> Option<String> {
        self.read(keys::ERROR_STATUS)
    }

    /// Record a remote error class for the next view to render.
    pub fn set_error_status(&self, status: &str) {
        self.save(keys::ERROR_STATUS, status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_save_read_remove_clear() {
        let store = SessionStore::in_memory();
        assert_eq!(store.read("missing"), None);

        store.save(keys::USERNAME, "mika");
        assert_eq!(store.read(keys::USERNAME).as_deref(), Some("mika"));

        store.remove(keys::USERNAME);
        assert_eq!(store.read(keys::USERNAME), None);

        store.save("a", "1");
        store.save("b", "2");
        store.clear();
        assert_eq!(store.read("a"), None);
        assert_eq!(store.read("b"), None);
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::in_memory();
        let other = store.clone();
        store.save("k", "v");
        assert_eq!(other.read("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_typed_helpers() {
        let store = SessionStore::in_memory();
        assert_eq!(store.username(), None);

        store.set_credentials("mika", "hunter");
        assert_eq!(store.username().as_deref(), Some("mika"));
        assert_eq!(
            store.password().map(|p| p.expose_secret().to_string()),
            Some("hunter".to_string())
        );

        store.set_error_status("401");
        assert_eq!(store.error_status().as_deref(), Some("401"));

        // Empty username is treated as unauthenticated.
        store.save(keys::USERNAME, "");
        assert_eq!(store.username(), None);
    }

    #[test]
    fn test_file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");

        let store = SessionStore::open(path.clone()).expect("open fresh");
        store.set_credentials("mika", "hunter");
        store.save(keys::SIZE, "FULL");
        drop(store);

        let reopened = SessionStore::open(path.clone()).expect("reopen");
        assert_eq!(reopened.username().as_deref(), Some("mika"));
        assert_eq!(reopened.read(keys::SIZE).as_deref(), Some("FULL"));

        reopened.clear();
        let cleared = SessionStore::open(path).expect("reopen after clear");
        assert_eq!(cleared.username(), None);
    }
}
