//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! Each module is a plain struct provided to components as an `RwSignal`
//! context by `App`.

pub mod location;
pub mod weather;
