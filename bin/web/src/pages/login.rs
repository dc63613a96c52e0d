//! Login page component.

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::request_token;
use crate::state::AppTokenManager;

/// Email and password form exchanging credentials for a bearer token.
///
/// On success the session is populated and the login route's guard sends
/// the user home.
#[component]
pub fn LoginPage() -> impl IntoView {
    let manager = expect_context::<Arc<AppTokenManager>>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let pending = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        pending.set(true);
        error.set(None);

        let manager = Arc::clone(&manager);
        let email = email.get_untracked();
        let password = password.get_untracked();
        spawn_local(async move {
            let result = request_token(&email, &password).await;
            pending.set(false);
            match result {
                Ok(token) => {
                    if manager.login(&token).is_none() {
                        error.set(Some("Could not start a session in this browser.".to_string()));
                    }
                }
                Err(message) => error.set(Some(message)),
            }
        });
    };

    view! {
        <div class="login-page">
            <div class="login-box">
                <h1>"Log in to Reservoir Watch"</h1>
                <form on:submit=on_submit>
                    <label for="email">"Email"</label>
                    <input
                        id="email"
                        type="email"
                        autocomplete="username"
                        required
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <label for="password">"Password"</label>
                    <input
                        id="password"
                        type="password"
                        autocomplete="current-password"
                        required
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
                    <button type="submit" class="login-button" disabled=move || pending.get()>
                        {move || if pending.get() { "Logging in..." } else { "Log in" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
