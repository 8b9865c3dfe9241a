//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components here are application chrome shared by every page; page bodies
//! live in `pages`.

pub mod nav_bar;
pub mod route_guard;
