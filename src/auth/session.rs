use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::jwt::is_token_expired;
use crate::api::ApiClient;
use crate::types::{AppError, Credentials, Result, UserId};

pub const KEY_USER_ID: &str = "userId";
pub const KEY_USERNAME: &str = "username";
pub const KEY_TOKEN: &str = "token";
pub const KEY_PRIVILEGE: &str = "privilege";

/// Storage keys, all persisted as plain strings and cleared together.
pub const SESSION_KEYS: [&str; 4] = [KEY_USER_ID, KEY_USERNAME, KEY_TOKEN, KEY_PRIVILEGE];

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub username: String,
    pub token: String,
    pub privilege: i64,
}

impl Session {
    /// Lecturers may upload and delete papers.
    pub fn is_lecturer(&self) -> bool {
        self.privilege > 0
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && !is_token_expired(&self.token, now)
    }

    pub fn greeting(&self) -> String {
        format!("Signed in as {}", self.username)
    }

    pub fn to_fields(&self) -> [(&'static str, String); 4] {
        [
            (KEY_USER_ID, self.user_id.to_string()),
            (KEY_USERNAME, self.username.clone()),
            (KEY_TOKEN, self.token.clone()),
            (KEY_PRIVILEGE, self.privilege.to_string()),
        ]
    }

    /// Rebuild a session from stored string fields.
    ///
    /// A missing token means no session. A stored session with an unreadable
    /// id or privilege is rejected rather than guessed at.
    pub fn from_fields<F>(mut get: F) -> Result<Option<Session>>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let token = match get(KEY_TOKEN) {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(None),
        };
        let user_id = get(KEY_USER_ID)
            .and_then(|id| id.trim().parse().ok())
            .ok_or_else(|| AppError::Storage("stored session has no valid userId".to_string()))?;
        let privilege = match get(KEY_PRIVILEGE) {
            Some(p) => p
                .trim()
                .parse()
                .map_err(|_| AppError::Storage(format!("invalid stored privilege '{}'", p)))?,
            None => 0,
        };

        Ok(Some(Session {
            user_id,
            username: get(KEY_USERNAME).unwrap_or_default(),
            token,
            privilege,
        }))
    }
}

/// The session, if its token is still live at `now`. An expired session
/// stays stored until logout but no longer counts as signed in.
pub fn live_session(session: Option<&Session>, now: DateTime<Utc>) -> Option<&Session> {
    session.filter(|s| s.is_authenticated_at(now))
}

// ============= Stores =============

/// Client-side persistence for the session fields.
pub trait SessionStore {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// In-process store, used by tests and as a fallback when nothing persists.
#[derive(Debug, Default)]
pub struct MemoryStore {
    fields: Mutex<BTreeMap<String, String>>,
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<Session>> {
        let fields = self.fields.lock();
        Session::from_fields(|key| fields.get(key).cloned())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut fields = self.fields.lock();
        for (key, value) in session.to_fields() {
            fields.insert(key.to_string(), value);
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut fields = self.fields.lock();
        for key in SESSION_KEYS {
            fields.remove(key);
        }
        Ok(())
    }
}

/// JSON file of string fields, used by the terminal client.
#[cfg(feature = "native")]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(feature = "native")]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(feature = "native")]
impl SessionStore for FileStore {
    fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let fields: BTreeMap<String, String> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Storage(format!("{} is not a session file: {}", self.path.display(), e))
        })?;
        Session::from_fields(|key| fields.get(key).cloned())
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let fields: BTreeMap<&str, String> = session.to_fields().into_iter().collect();
        let json = serde_json::to_string_pretty(&fields)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============= Login / Logout =============

/// Exchange credentials for a session. Nothing is persisted here.
pub async fn authenticate(client: &ApiClient, credentials: &Credentials) -> Result<Session> {
    let response = client
        .authenticate(credentials)
        .await
        .map_err(|e| AppError::Auth(format!("Login failed: {}", e)))?;

    Ok(Session {
        user_id: response.user.id,
        username: credentials.username.clone(),
        token: response.token,
        privilege: response.privilege,
    })
}

/// Owns the current session and keeps it in step with its store.
pub struct SessionManager<S: SessionStore> {
    client: ApiClient,
    store: S,
    current: RwLock<Option<Session>>,
}

impl<S: SessionStore> SessionManager<S> {
    /// Picks up any session already persisted in `store`.
    pub fn new(client: ApiClient, store: S) -> Self {
        let current = store.load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring stored session: {}", e);
            None
        });
        Self {
            client,
            store,
            current: RwLock::new(current),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .as_ref()
            .is_some_and(Session::is_authenticated)
    }

    /// Client carrying the current session's token, if any.
    pub fn client(&self) -> ApiClient {
        match self.current.read().as_ref() {
            Some(session) => self.client.with_session(session),
            None => self.client.clone(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let session = authenticate(&self.client, credentials).await?;

        if let Err(e) = self.store.save(&session) {
            // A half-written session must not survive.
            let _ = self.store.clear();
            return Err(e);
        }

        tracing::info!(user_id = session.user_id, "Signed in as {}", session.username);
        *self.current.write() = Some(session.clone());
        Ok(session)
    }

    /// Create a student account, then sign in with the same credentials.
    pub async fn register(&self, credentials: &Credentials) -> Result<Session> {
        let created = self.client.register_student(credentials).await?;
        tracing::info!(user_id = created.id, "Registered {}", credentials.username);
        self.login(credentials).await
    }

    pub fn logout(&self) -> Result<()> {
        *self.current.write() = None;
        tracing::info!("Signed out");
        self.store.clear()
    }
}
