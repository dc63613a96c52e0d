//! Client-side session and access control for reservoir-watch.
//!
//! This crate provides:
//! - Bearer token decoding (`codec`)
//! - The process-wide session store and its read-only handles (`session`)
//! - The persistent token slot abstraction (`storage`)
//! - Token lifecycle management: initialize, login, logout (`manager`)
//! - Typed per-route requirements and the route table (`route`)
//! - The navigation guard consulted before every transition (`guard`)
//!
//! Nothing here is a security boundary. The API server validates tokens and
//! enforces roles on its own; this crate only decides what the UI shows.
//!
//! # Example
//!
//! ```
//! use reservoir_watch_access::{
//!     AccessConfig, Decision, MemoryTokenStorage, NavigationGuard, Route, RouteRequirement,
//!     RouteTable, SessionStore, TokenManager,
//! };
//!
//! let config = AccessConfig::default();
//! let manager = TokenManager::new(MemoryTokenStorage::new(), SessionStore::new());
//! manager.initialize();
//!
//! let routes = RouteTable::new(vec![
//!     Route::new("/login"),
//!     Route::new("/").requires(RouteRequirement::AuthOnly),
//! ]);
//! let guard = NavigationGuard::new(routes, manager.session(), &config);
//!
//! assert_eq!(guard.evaluate("/"), Decision::RedirectLogin);
//! assert_eq!(guard.evaluate("/login"), Decision::Proceed);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod guard;
pub mod identity;
pub mod manager;
pub mod route;
pub mod session;
pub mod storage;

// Re-export main types at crate root
pub use codec::{Claims, decode};
pub use config::AccessConfig;
pub use error::{MalformedToken, PermissionDenied, Result, StorageError};
pub use guard::{Decision, GuardAction, NavigationGuard, decide};
pub use identity::Identity;
pub use manager::TokenManager;
pub use route::{Route, RouteEntry, RouteRequirement, RouteTable};
pub use session::{ObserverId, SessionHandle, SessionState, SessionStore};
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
