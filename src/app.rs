//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

use crate::components::{nav_bar::NavBar, route_guard::RouteGuard};
use crate::pages::{login::LoginPage, placeholder::RoutePlaceholder};
use crate::routes::HOME_PATH;
use crate::state::{location::LocationState, weather::WeatherState};

/// Root application component.
///
/// Provides shared location/weather state, starts the live weather lookup
/// that fills it, and sets up guarded client-side routing. Paths here must
/// stay in sync with `routes::ROUTES`.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let location = RwSignal::new(LocationState::default());
    let weather = RwSignal::new(WeatherState::default());
    provide_context(location);
    provide_context(weather);

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(crate::util::live_weather::refresh(location, weather));

    view! {
        <Title text="Plant Health"/>

        <Router>
            <NavBar/>
            <RouteGuard>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=path!("/") view=|| view! { <Redirect path=HOME_PATH/> }/>
                    <Route path=path!("/home") view=|| view! { <RoutePlaceholder name="home"/> }/>
                    <Route path=path!("/news/:id") view=|| view! { <RoutePlaceholder name="news-detail"/> }/>
                    <Route path=path!("/detect") view=|| view! { <RoutePlaceholder name="detect"/> }/>
                    <Route path=path!("/history") view=|| view! { <RoutePlaceholder name="history"/> }/>
                    <Route path=path!("/knowledge") view=|| view! { <RoutePlaceholder name="knowledge"/> }/>
                    <Route path=path!("/guide") view=|| view! { <RoutePlaceholder name="guide"/> }/>
                    <Route path=path!("/guide/:id") view=|| view! { <RoutePlaceholder name="guide-detail"/> }/>
                    <Route path=path!("/cart") view=|| view! { <RoutePlaceholder name="cart"/> }/>
                    <Route path=path!("/shop/item/:id") view=|| view! { <RoutePlaceholder name="shop-item"/> }/>
                    <Route path=path!("/shop/pay/:id") view=|| view! { <RoutePlaceholder name="shop-pay"/> }/>
                    <Route path=path!("/orders") view=|| view! { <RoutePlaceholder name="orders"/> }/>
                    <Route path=path!("/shop/pay/result/:id") view=|| view! { <RoutePlaceholder name="pay-result"/> }/>
                    <Route path=path!("/admin") view=|| view! { <RoutePlaceholder name="admin"/> }/>
                    <Route path=path!("/chat") view=|| view! { <RoutePlaceholder name="chat"/> }/>
                    <Route path=path!("/login") view=LoginPage/>
                    <Route path=path!("/register") view=|| view! { <RoutePlaceholder name="register"/> }/>
                    <Route path=path!("/profile") view=|| view! { <RoutePlaceholder name="profile"/> }/>
                </Routes>
            </RouteGuard>
        </Router>
    }
}
