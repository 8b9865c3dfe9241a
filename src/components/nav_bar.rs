//! Top navigation bar with the signed-in user, weather summary and logout.

use leptos::prelude::*;
use leptos_router::hooks::use_location;

use crate::routes::{ADMIN_PATH, is_auth_page};
use crate::state::weather::WeatherState;
use crate::util::session::browser_session;

#[component]
pub fn NavBar() -> impl IntoView {
    let weather = expect_context::<RwSignal<WeatherState>>();
    let location = use_location();

    // Re-read on navigation; login/logout always change the route.
    let session = Memo::new(move |_| {
        location.pathname.track();
        browser_session().read()
    });
    let display_name = move || {
        session
            .get()
            .map(|s| if s.nickname.is_empty() { s.username } else { s.nickname })
            .unwrap_or_default()
    };
    let is_admin = move || session.get().is_some_and(|s| s.is_admin());

    let weather_summary = move || {
        let w = weather.get();
        w.has_report().then(|| format!("{} {} {}°C", w.city, w.text, w.temperature))
    };

    let on_logout = move |_| {
        #[cfg(feature = "csr")]
        {
            leptos::task::spawn_local(async move {
                if let Err(e) = crate::net::api::gateway().logout().await {
                    log::warn!("logout request failed: {e}");
                }
                if let Some(w) = web_sys::window() {
                    let _ = w.location().set_href(crate::routes::LOGIN_PATH);
                }
            });
        }
    };

    view! {
        <Show when=move || !is_auth_page(&location.pathname.get())>
            <nav class="nav-bar">
                <a href="/home" class="nav-bar__brand">"Plant Health"</a>
                <a href="/detect">"Detect"</a>
                <a href="/knowledge">"Knowledge"</a>
                <a href="/guide">"Guides"</a>
                <a href="/chat">"Chat"</a>
                <a href="/cart">"Cart"</a>
                <Show when=is_admin>
                    <a href=ADMIN_PATH>"Admin"</a>
                </Show>
                <span class="nav-bar__spacer"></span>
                <span class="nav-bar__weather">{move || weather_summary().unwrap_or_default()}</span>
                <a href="/profile" class="nav-bar__user">{display_name}</a>
                <button class="btn nav-bar__logout" on:click=on_logout>"Log out"</button>
            </nav>
        </Show>
    }
}
