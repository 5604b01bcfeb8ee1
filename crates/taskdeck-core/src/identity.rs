//! Durable session storage: the bridge that lets a login survive
//! process restarts.
//!
//! All identity reads and writes go through the [`IdentityStore`] trait
//! so the 401/403 clearing side effect in the HTTP adapter is auditable
//! in one place, and so tests can substitute an in-memory store.

use crate::error::Result;
use crate::io;
use crate::model::{Session, UserSummary};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

/// Durable store for the authenticated session.
///
/// `store` and `clear` never surface errors: logout must not be able to
/// fail. Write problems are logged and the in-memory session state stays
/// authoritative for the rest of the process.
pub trait IdentityStore: Send + Sync {
    /// Read the persisted session, if any. Malformed data is treated as
    /// absence.
    fn load(&self) -> Option<Session>;

    fn store(&self, session: &Session);

    fn clear(&self);
}

// ---------------------------------------------------------------------------
// On-disk document
// ---------------------------------------------------------------------------

/// The persisted shape: `token` plus the JSON-serialized user summary,
/// replaced whole on every write.
#[derive(Debug, Serialize, Deserialize)]
struct IdentityDocument {
    token: String,
    user: UserSummary,
}

// ---------------------------------------------------------------------------
// FileIdentityStore
// ---------------------------------------------------------------------------

pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the store at the platform default location. `None` when no
    /// durable data directory exists in this environment; callers fall
    /// back to [`NullIdentityStore`].
    pub fn discover() -> Option<Self> {
        paths::identity_path().map(Self::new)
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_document(&self) -> Result<Option<IdentityDocument>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Option<Session> {
        match self.read_document() {
            Ok(Some(doc)) => Some(Session::new(doc.user, doc.token)),
            Ok(None) => None,
            Err(err) => {
                // Corrupt entry: self-heal by removing it.
                tracing::warn!(path = %self.path.display(), %err, "clearing malformed identity file");
                self.clear();
                None
            }
        }
    }

    fn store(&self, session: &Session) {
        let (Some(user), Some(token)) = (&session.user, &session.token) else {
            // An unauthenticated session has nothing to persist.
            self.clear();
            return;
        };
        let doc = IdentityDocument {
            token: token.clone(),
            user: user.clone(),
        };
        let write = serde_json::to_vec_pretty(&doc)
            .map_err(crate::error::ApiError::from)
            .and_then(|data| io::atomic_write(&self.path, &data));
        if let Err(err) = write {
            tracing::warn!(path = %self.path.display(), %err, "failed to persist identity");
        }
    }

    fn clear(&self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), %err, "failed to clear identity");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryIdentityStore
// ---------------------------------------------------------------------------

/// In-memory store for tests and single-run sessions.
#[derive(Default)]
pub struct MemoryIdentityStore {
    session: Mutex<Option<Session>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }

    fn store(&self, session: &Session) {
        *self.session.lock().unwrap() = session.is_authenticated().then(|| session.clone());
    }

    fn clear(&self) {
        *self.session.lock().unwrap() = None;
    }
}

// ---------------------------------------------------------------------------
// NullIdentityStore
// ---------------------------------------------------------------------------

/// No-op store for environments without a durable location. Loads
/// nothing, stores nothing.
pub struct NullIdentityStore;

impl IdentityStore for NullIdentityStore {
    fn load(&self) -> Option<Session> {
        None
    }

    fn store(&self, _session: &Session) {}

    fn clear(&self) {}
}

/// The platform store when one is available, the null store otherwise.
/// Shared as an `Arc` so the adapter and the auth slice see one store.
pub fn default_store() -> std::sync::Arc<dyn IdentityStore> {
    match FileIdentityStore::discover() {
        Some(store) => std::sync::Arc::new(store),
        None => std::sync::Arc::new(NullIdentityStore),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
