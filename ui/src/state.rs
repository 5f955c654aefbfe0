//! Global application state

use biblio::auth::session::SESSION_KEYS;
use biblio::auth::{live_session, Session, SessionManager, SessionStore};
use biblio::types::{AppError, Result};
use biblio::views::Viewer;
use biblio::{ApiClient, ClientConfig};
use chrono::Utc;
use gloo_storage::{LocalStorage, Storage};
use leptos::prelude::*;
use wasm_bindgen::JsValue;

/// Session fields in browser local storage, one plain string per key.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

fn storage_error(err: JsValue) -> AppError {
    AppError::Storage(format!("local storage unavailable: {:?}", err))
}

impl SessionStore for LocalStorageStore {
    fn load(&self) -> Result<Option<Session>> {
        let storage = LocalStorage::raw();
        Session::from_fields(|key| storage.get_item(key).ok().flatten())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let storage = LocalStorage::raw();
        for (key, value) in session.to_fields() {
            storage.set_item(key, &value).map_err(storage_error)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let storage = LocalStorage::raw();
        for key in SESSION_KEYS {
            storage.remove_item(key).map_err(storage_error)?;
        }
        Ok(())
    }
}

/// Global application state
#[derive(Clone)]
pub struct AppState {
    /// Signed-in user, mirrored in local storage
    pub session: RwSignal<Option<Session>>,
    pub config: ClientConfig,
}

impl AppState {
    pub fn new() -> Self {
        let session = LocalStorageStore.load().unwrap_or_else(|e| {
            tracing::warn!("Discarding stored session: {}", e);
            None
        });

        Self {
            session: RwSignal::new(session),
            config: ClientConfig::default(),
        }
    }

    /// API client carrying the current token.
    pub fn api(&self) -> ApiClient {
        let client = ApiClient::from_config(&self.config);
        match self.session.get_untracked() {
            Some(session) => client.with_session(&session),
            None => client,
        }
    }

    pub fn sessions(&self) -> SessionManager<LocalStorageStore> {
        SessionManager::new(ApiClient::from_config(&self.config), LocalStorageStore)
    }

    pub fn viewer(&self) -> Option<Viewer> {
        self.session.with_untracked(|s| s.as_ref().map(Viewer::from))
    }

    pub fn is_lecturer(&self) -> bool {
        self.session
            .with(|s| live_session(s.as_ref(), Utc::now()).is_some_and(Session::is_lecturer))
    }

    pub fn logout(&self) {
        if let Err(e) = self.sessions().logout() {
            tracing::error!("Could not clear session: {}", e);
        }
        self.session.set(None);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
