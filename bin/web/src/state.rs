//! Shared application state provided through Leptos context.

use leptos::prelude::RwSignal;
use reservoir_watch_access::{Identity, TokenManager};

use crate::storage::BrowserTokenStorage;

/// The token manager used by the running application.
pub type AppTokenManager = TokenManager<BrowserTokenStorage>;

/// Reactive mirror of the session's current identity.
#[derive(Clone, Copy)]
pub struct CurrentIdentity(pub RwSignal<Option<Identity>>);

/// Pending notice for the banner, set when navigation was denied.
#[derive(Clone, Copy)]
pub struct Notice(pub RwSignal<Option<String>>);
