//! Route gating for the Leptos router.
//!
//! Every route view is wrapped in [`Guarded`], which asks the
//! [`NavigationGuard`] about the current location and either renders the
//! view or redirects.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::{components::Redirect, hooks::use_location};
use reservoir_watch_access::{GuardAction, NavigationGuard};

use crate::state::{CurrentIdentity, Notice};

/// Renders `children` only if the guard lets the current location through.
#[component]
pub fn Guarded(children: ChildrenFn) -> impl IntoView {
    let guard = expect_context::<Arc<NavigationGuard>>();
    let CurrentIdentity(identity) = expect_context::<CurrentIdentity>();
    let Notice(notice) = expect_context::<Notice>();
    let location = use_location();

    // Re-evaluated on navigation and on sign-in or sign-out.
    let action = Memo::new(move |_| {
        identity.track();
        guard.action(&location.pathname.get())
    });

    Effect::new(move || {
        if let GuardAction::Redirect {
            notice: Some(text), ..
        } = action.get()
        {
            notice.set(Some(text));
        }
    });

    move || match action.get() {
        GuardAction::Proceed => children().into_any(),
        GuardAction::Redirect { to, .. } => view! { <Redirect path=to/> }.into_any(),
    }
}

/// Shows the pending notice, if any, with a dismiss button.
#[component]
pub fn NoticeBanner() -> impl IntoView {
    let Notice(notice) = expect_context::<Notice>();

    move || {
        notice.get().map(|text| {
            view! {
                <div class="notice" role="alert">
                    <span>{text}</span>
                    <button class="notice-dismiss" on:click=move |_| notice.set(None)>"Dismiss"</button>
                </div>
            }
        })
    }
}
