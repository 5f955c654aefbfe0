//! Session handling and route guards
//!
//! The portal authenticates with a JWT issued by the API. The client never
//! verifies the signature; it only decodes the `exp` claim to decide whether
//! the stored session is still usable.
//!
//! # Module Structure
//!
//! - [`auth::jwt`](crate::auth::jwt) - structural decode of the token expiry
//! - [`auth::session`](crate::auth::session) - the session value, its stores and login/logout
//! - [`auth::guards`](crate::auth::guards) - routes and the predicates that gate them
//!
//! # Usage
//!
//! ```ignore
//! use biblio::auth::{authorize, Access, MemoryStore, Route, SessionManager};
//!
//! let manager = SessionManager::new(client, MemoryStore::default());
//! manager.login(&Credentials::new("ada", "secret")).await?;
//!
//! match authorize(&Route::Upload, manager.current().as_ref()) {
//!     Access::Allow => { /* render */ }
//!     Access::Redirect(to) => { /* navigate to `to.path()` */ }
//! }
//! ```

pub mod guards;
pub mod jwt;
pub mod session;

pub use guards::{authorize, Access, Guard, Route};
pub use session::{live_session, MemoryStore, Session, SessionManager, SessionStore};

#[cfg(feature = "native")]
pub use session::FileStore;
