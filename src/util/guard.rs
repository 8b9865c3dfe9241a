//! Navigation guard decisions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every routed page renders through `RouteGuard`, which asks [`decide`]
//! whether the current session may see the target route. The decision is a
//! pure function of the route descriptor and the session state so it can be
//! tested without a router.
//!
//! ORDER
//! =====
//! 1. Auth-required route with no usable record: go to `/login`.
//! 2. Admin route: re-checked on its own. No record or an unparseable one
//!    goes to `/login`; a non-admin role goes to `/home`.
//! 3. Anything else renders.
//!
//! Login and register never require auth, so a redirect target is always
//! reachable and redirects cannot loop.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::routes::{HOME_PATH, LOGIN_PATH, RouteDescriptor};
use crate::util::session::SessionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

pub fn decide(route: &RouteDescriptor, session: &SessionState) -> GuardDecision {
    if route.requires_auth && !session.is_authenticated() {
        return GuardDecision::Redirect(LOGIN_PATH);
    }
    if route.role_restricted {
        return match session {
            SessionState::Absent | SessionState::Malformed => GuardDecision::Redirect(LOGIN_PATH),
            SessionState::Present(record) if !record.is_admin() => GuardDecision::Redirect(HOME_PATH),
            SessionState::Present(_) => GuardDecision::Allow,
        };
    }
    GuardDecision::Allow
}

/// Guard decision for a live pathname. Unregistered paths are allowed so
/// the router fallback can render.
pub fn decide_path(pathname: &str, session: &SessionState) -> GuardDecision {
    let decision = crate::routes::find_route(pathname).map_or(GuardDecision::Allow, |route| decide(route, session));
    if let GuardDecision::Redirect(to) = decision {
        log::info!("guard: {pathname} -> {to}");
    }
    decision
}
