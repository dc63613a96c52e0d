//! Main Leptos application component and routing.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    components::{ParentRoute, Redirect, Route, Router, Routes},
    path,
};
use reservoir_watch_access::{AccessConfig, Identity, NavigationGuard, SessionStore, TokenManager};

use crate::gate::{Guarded, NoticeBanner};
use crate::pages::{DashboardHome, DashboardLayout, LoginPage, UserManagementPage};
use crate::routes::route_table;
use crate::state::{AppTokenManager, CurrentIdentity, Notice};
use crate::storage::BrowserTokenStorage;

/// The main application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AccessConfig::default();
    let store = SessionStore::new();
    let session = store.handle();
    let manager: Arc<AppTokenManager> = Arc::new(TokenManager::new(
        BrowserTokenStorage::new(config.token_key()),
        store,
    ));

    let identity = RwSignal::new(None::<Identity>);
    session.subscribe(move |state| identity.set(state.current_identity().cloned()));

    // The guard must never see the session before the persisted token is read.
    manager.initialize();

    provide_context(Arc::new(NavigationGuard::new(route_table(), session, &config)));
    provide_context(manager);
    provide_context(CurrentIdentity(identity));
    provide_context(Notice(RwSignal::new(None)));

    view! {
        <Title text="Reservoir Watch"/>
        <Router>
            <NoticeBanner/>
            <main class="container">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=path!("/login") view=|| view! { <Guarded><LoginPage/></Guarded> }/>
                    <ParentRoute path=path!("/") view=|| view! { <Guarded><DashboardLayout/></Guarded> }>
                        <Route path=path!("") view=DashboardHome/>
                        <Route path=path!("users") view=|| view! { <Guarded><UserManagementPage/></Guarded> }/>
                    </ParentRoute>
                    <Route path=path!("/*any") view=|| view! { <Redirect path="/"/> }/>
                </Routes>
            </main>
        </Router>
    }
}
