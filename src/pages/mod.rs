//! Page modules for route-level screens.

pub mod login;
pub mod placeholder;
