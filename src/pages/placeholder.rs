//! Generic frame for routes whose page content lives outside this crate.
//!
//! Renders the route name so navigation and guarding work end to end.

use leptos::prelude::*;

#[component]
pub fn RoutePlaceholder(name: &'static str) -> impl IntoView {
    view! {
        <main class="route-page" data-route=name>
            <h2 class="route-page__title">{name}</h2>
        </main>
    }
}
