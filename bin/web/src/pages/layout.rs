//! Dashboard layout shared by every signed-in screen.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::components::{A, Outlet};

use crate::routes::{ADMIN_ROLE, USERS_PATH};
use crate::state::{AppTokenManager, CurrentIdentity};

/// Header with navigation and the signed-in user, plus the nested page.
#[component]
pub fn DashboardLayout() -> impl IntoView {
    let manager = expect_context::<Arc<AppTokenManager>>();
    let CurrentIdentity(identity) = expect_context::<CurrentIdentity>();

    let label = move || {
        identity.with(|identity| {
            identity
                .as_ref()
                .map(|identity| format!("{} ({})", identity.label(), identity.role()))
                .unwrap_or_default()
        })
    };
    let is_admin = move || {
        identity.with(|identity| identity.as_ref().is_some_and(|i| i.has_role(ADMIN_ROLE)))
    };

    view! {
        <div class="dashboard">
            <header class="header">
                <div class="header-left">
                    <A href="/">"Reservoir Watch"</A>
                    <nav>
                        <A href="/">"Overview"</A>
                        <Show when=is_admin>
                            <A href=USERS_PATH>"Users"</A>
                        </Show>
                    </nav>
                </div>
                <div class="header-right">
                    <span class="user-name">{label}</span>
                    <button class="logout-button" on:click=move |_| manager.logout()>"Log out"</button>
                </div>
            </header>
            <section class="dashboard-content">
                <Outlet/>
            </section>
        </div>
    }
}
