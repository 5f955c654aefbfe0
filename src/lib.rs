//! # Biblio
//!
//! Client for a university past-exam-paper portal: students browse papers,
//! read and vote on answers to each question and post their own; lecturers
//! upload and remove papers.
//!
//! The crate holds everything that is not rendering. The browser app in
//! `ui/` and the `biblio` terminal client are both thin shells over it.
//!
//! ## Modules
//!
//! - [`types`] - wire types and [`AppError`]
//! - [`model`] - answers, per-question solutions, votes and papers
//! - [`auth`] - JWT expiry checks, the session and its stores, route guards
//! - [`api`] - one async call per API operation
//! - [`views`] - state and orchestration for the search, upload and paper pages
//! - [`schedule`] - periodic refresh schedules and native refresh tasks
//! - [`utils`] - configuration
//!
//! ## Features
//!
//! - `native` (default): tokio refresh tasks, the file session store, TOML
//!   configuration loading and the CLI. Disable it for `wasm32` builds.
//!
//! ## Example
//!
//! ```ignore
//! use biblio::{ApiClient, MemoryStore, SessionManager};
//! use biblio::types::Credentials;
//! use biblio::views::{SolutionPageController, Viewer};
//!
//! let sessions = SessionManager::new(ApiClient::new("http://localhost:8000"), MemoryStore::default());
//! let session = sessions.login(&Credentials::new("ada", "secret")).await?;
//!
//! let mut page = SolutionPageController::new(sessions.client(), Viewer::from(&session), "CS101", 2019);
//! page.load().await?;
//! ```

pub mod api;
pub mod auth;
pub mod model;
pub mod schedule;
pub mod types;
pub mod utils;
pub mod views;

#[cfg(feature = "native")]
pub mod cli;

pub use api::ApiClient;
pub use auth::{authorize, Access, MemoryStore, Route, Session, SessionManager, SessionStore};
pub use model::{Answer, Paper, Solution, Vote};
pub use schedule::RefreshSchedule;
pub use types::{AppError, Result};
pub use utils::config::ClientConfig;
