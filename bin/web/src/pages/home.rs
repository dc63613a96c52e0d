//! Dashboard home page.

use leptos::prelude::*;

use crate::state::CurrentIdentity;

/// Landing screen after sign-in.
#[component]
pub fn DashboardHome() -> impl IntoView {
    let CurrentIdentity(identity) = expect_context::<CurrentIdentity>();

    let greeting = move || {
        identity.with(|identity| {
            identity
                .as_ref()
                .map(|identity| format!("Welcome, {}!", identity.label()))
                .unwrap_or_else(|| "Welcome!".to_string())
        })
    };

    view! {
        <div class="home-page">
            <h1>{greeting}</h1>
            <p>"Reservoir levels and sensor readings are shown here."</p>
        </div>
    }
}
