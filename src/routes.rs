//! Static route table and path matching.
//!
//! DESIGN
//! ======
//! The Leptos `<Routes>` tree owns view dispatch; this table owns the access
//! metadata the navigation guard needs. Both are keyed by the same path
//! patterns so the guard can look up a descriptor from the live pathname.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

pub const ROOT_PATH: &str = "/";
pub const HOME_PATH: &str = "/home";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const ADMIN_PATH: &str = "/admin";

/// Access metadata for one registered route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Pattern; `:name` segments match any single non-empty segment.
    pub path: &'static str,
    pub name: &'static str,
    pub requires_auth: bool,
    /// Only sessions holding the admin role may enter.
    pub role_restricted: bool,
}

impl RouteDescriptor {
    const fn private(path: &'static str, name: &'static str) -> Self {
        Self { path, name, requires_auth: true, role_restricted: false }
    }

    const fn public(path: &'static str, name: &'static str) -> Self {
        Self { path, name, requires_auth: false, role_restricted: false }
    }

    const fn admin(path: &'static str, name: &'static str) -> Self {
        Self { path, name, requires_auth: true, role_restricted: true }
    }

    /// Whether `pathname` matches this route's pattern.
    pub fn matches(&self, pathname: &str) -> bool {
        let mut pattern = segments(self.path);
        let mut actual = segments(pathname);
        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return true,
                (Some(p), Some(a)) if p.starts_with(':') || p == a => {}
                _ => return false,
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Registered routes, in match order. `/` is handled as a redirect and is
/// not listed.
pub const ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor::private(HOME_PATH, "home"),
    RouteDescriptor::private("/news/:id", "news-detail"),
    RouteDescriptor::private("/detect", "detect"),
    RouteDescriptor::private("/history", "history"),
    RouteDescriptor::private("/knowledge", "knowledge"),
    RouteDescriptor::private("/guide", "guide"),
    RouteDescriptor::private("/guide/:id", "guide-detail"),
    RouteDescriptor::private("/cart", "cart"),
    RouteDescriptor::private("/shop/item/:id", "shop-item"),
    RouteDescriptor::private("/shop/pay/:id", "shop-pay"),
    RouteDescriptor::private("/orders", "orders"),
    RouteDescriptor::private("/shop/pay/result/:id", "pay-result"),
    RouteDescriptor::admin(ADMIN_PATH, "admin"),
    RouteDescriptor::private("/chat", "chat"),
    RouteDescriptor::public(LOGIN_PATH, "login"),
    RouteDescriptor::public(REGISTER_PATH, "register"),
    RouteDescriptor::private("/profile", "profile"),
];

/// First registered route matching `pathname`.
pub fn find_route(pathname: &str) -> Option<&'static RouteDescriptor> {
    ROUTES.iter().find(|route| route.matches(pathname))
}

/// Login and registration pages are never redirected away from.
pub fn is_auth_page(pathname: &str) -> bool {
    pathname.starts_with(LOGIN_PATH) || pathname.starts_with(REGISTER_PATH)
}
