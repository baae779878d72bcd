//! Session persistence module.
//!
//! This module owns the only durable state of the application: whether the
//! user is logged in and which role they chose. It contains:
//! - The `SessionStore` key/value trait and its file and memory backends
//! - The `Session` record read from and written to a store
//! - Session error handling

mod error;

pub use error::SessionError;

use crate::roles::Role;
use log::*;
use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// Key holding the logged-in flag ("true" or "false").
pub const LOGGED_IN_KEY: &str = "isLoggedIn";

/// Key holding the role identifier.
pub const USER_TYPE_KEY: &str = "userType";

const FILE_NAME: &str = "session.json";
const DEFAULT_DIRECTORY_PATH: &str = ".config/citizen-portal";

/// Durable key/value surface backing the session.
///
pub trait SessionStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;
}

/// Durable session record.
///
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Session {
    pub is_logged_in: bool,
    pub user_type: Option<Role>,
}

impl Session {
    /// Read the session from the store. A missing or unrecognised role is
    /// treated as no role.
    ///
    pub fn read(store: &dyn SessionStore) -> Session {
        let is_logged_in = store
            .get(LOGGED_IN_KEY)
            .map(|value| value.trim() == "true")
            .unwrap_or(false);
        let user_type = store.get(USER_TYPE_KEY).and_then(|id| {
            let role = Role::from_id(&id);
            if role.is_none() {
                warn!("Ignoring unknown stored role '{}'", id);
            }
            role
        });
        Session {
            is_logged_in,
            user_type,
        }
    }

    /// Returns the role only while logged in.
    ///
    pub fn trusted_role(&self) -> Option<Role> {
        if self.is_logged_in {
            self.user_type
        } else {
            None
        }
    }

    /// Returns true when a cold start may skip the login screen.
    ///
    pub fn can_restore(&self) -> bool {
        self.trusted_role().is_some()
    }

    /// Persist the logged-in flag, leaving the stored role untouched.
    ///
    pub fn write_login(store: &mut dyn SessionStore) -> Result<(), SessionError> {
        store.set(LOGGED_IN_KEY, "true")
    }

    /// Persist a fresh session for the given role.
    ///
    pub fn write_sign_up(store: &mut dyn SessionStore, role: Role) -> Result<(), SessionError> {
        store.set(LOGGED_IN_KEY, "true")?;
        store.set(USER_TYPE_KEY, role.id())
    }

    /// Remove both session keys.
    ///
    pub fn clear(store: &mut dyn SessionStore) -> Result<(), SessionError> {
        // Attempt both removals even if the first one fails.
        let flag = store.remove(LOGGED_IN_KEY);
        let role = store.remove(USER_TYPE_KEY);
        flag.and(role)
    }
}

/// In-memory store. Clones share the same entries, which lets a test simulate
/// a process restart by handing a clone to a fresh state.
///
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        MemorySessionStore::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
        Ok(())
    }
}

/// Store backed by a JSON map on disk. Every mutation rewrites the file.
///
#[derive(Debug)]
pub struct FileSessionStore {
    file_path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileSessionStore {
    /// Open the store in the given directory, or the default directory under
    /// $HOME. A missing file yields an empty store.
    ///
    pub fn open(custom_dir: Option<&Path>) -> Result<FileSessionStore, SessionError> {
        let dir_path = match custom_dir {
            Some(path) => path.to_path_buf(),
            None => FileSessionStore::default_path()?,
        };
        let file_path = dir_path.join(FILE_NAME);

        let entries = if file_path.exists() {
            let contents =
                fs::read_to_string(&file_path).map_err(|e| SessionError::LoadFailed {
                    path: file_path.clone(),
                    source: e,
                })?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)
                    .map_err(|e| SessionError::DeserializationFailed(e.to_string()))?
            }
        } else {
            BTreeMap::new()
        };
        debug!("Opened session store at {}", file_path.display());

        Ok(FileSessionStore { file_path, entries })
    }

    /// Returns the path of the backing file.
    ///
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn save(&self) -> Result<(), SessionError> {
        let content = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| SessionError::SerializationFailed(e.to_string()))?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| SessionError::SaveFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(&self.file_path).map_err(|e| SessionError::SaveFailed {
            path: self.file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| SessionError::SaveFailed {
            path: self.file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| SessionError::SaveFailed {
            path: self.file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    fn default_path() -> Result<PathBuf, SessionError> {
        match dirs::home_dir() {
            Some(home) => Ok(home.join(DEFAULT_DIRECTORY_PATH)),
            None => Err(SessionError::HomeDirectoryNotFound),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_empty_store() {
        let store = MemorySessionStore::new();
        assert_eq!(Session::read(&store), Session::default());
    }

    #[test]
    fn read_flag_without_role() {
        let mut store = MemorySessionStore::new();
        store.set(LOGGED_IN_KEY, "true").unwrap();
        let session = Session::read(&store);
        assert!(session.is_logged_in);
        assert_eq!(session.user_type, None);
        assert!(!session.can_restore());
    }

    #[test]
    fn read_role_without_flag_is_not_trusted() {
        let mut store = MemorySessionStore::new();
        store.set(USER_TYPE_KEY, "lawyer").unwrap();
        let session = Session::read(&store);
        assert!(!session.is_logged_in);
        assert_eq!(session.user_type, Some(Role::Lawyer));
        assert_eq!(session.trusted_role(), None);
    }

    #[test]
    fn read_unknown_role_as_none() {
        let mut store = MemorySessionStore::new();
        store.set(LOGGED_IN_KEY, "true").unwrap();
        store.set(USER_TYPE_KEY, "wizard").unwrap();
        assert_eq!(Session::read(&store).user_type, None);
    }

    #[test]
    fn sign_up_then_clear() {
        let mut store = MemorySessionStore::new();
        Session::write_sign_up(&mut store, Role::Business).unwrap();
        assert_eq!(
            Session::read(&store),
            Session {
                is_logged_in: true,
                user_type: Some(Role::Business)
            }
        );

        Session::clear(&mut store).unwrap();
        assert_eq!(store.get(LOGGED_IN_KEY), None);
        assert_eq!(store.get(USER_TYPE_KEY), None);
    }

    #[test]
    fn memory_clones_share_entries() {
        let mut store = MemorySessionStore::new();
        let clone = store.clone();
        Session::write_login(&mut store).unwrap();
        assert!(Session::read(&clone).is_logged_in);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = FileSessionStore::open(Some(dir.path())).unwrap();
            Session::write_sign_up(&mut store, Role::Officer).unwrap();
        }
        let store = FileSessionStore::open(Some(dir.path())).unwrap();
        assert_eq!(Session::read(&store).trusted_role(), Some(Role::Officer));
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(Some(&dir.path().join("nested"))).unwrap();
        assert_eq!(store.get(LOGGED_IN_KEY), None);
        assert!(!store.file_path().exists());
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FILE_NAME), "not json").unwrap();
        let result = FileSessionStore::open(Some(dir.path()));
        assert!(matches!(
            result,
            Err(SessionError::DeserializationFailed(_))
        ));
    }
}
