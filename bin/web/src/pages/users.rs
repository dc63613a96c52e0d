//! User management page (admin only).

use leptos::prelude::*;

/// Administration of dashboard accounts.
#[component]
pub fn UserManagementPage() -> impl IntoView {
    view! {
        <div class="users-page">
            <h1>"User management"</h1>
            <p>"Create accounts and assign roles for the monitoring team."</p>
        </div>
    }
}
