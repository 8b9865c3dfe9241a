//! Router adapter for the navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps the `<Routes>` tree. Whenever the pathname changes the guard
//! decision is recomputed from `sessionStorage` before the matched page is
//! shown; a redirect replaces the page with a client-side navigation.

use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;

use crate::util::guard::{GuardDecision, decide_path};
use crate::util::session::browser_session;

#[component]
pub fn RouteGuard(children: ChildrenFn) -> impl IntoView {
    let location = use_location();
    let decision = Memo::new(move |_| decide_path(&location.pathname.get(), &browser_session().state()));

    let redirect = move || match decision.get() {
        GuardDecision::Redirect(to) => view! { <Redirect path=to/> }.into_any(),
        GuardDecision::Allow => ().into_any(),
    };

    view! {
        <Show when=move || decision.get() == GuardDecision::Allow fallback=redirect>
            {children()}
        </Show>
    }
}
