//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, script
//! injection, AMap service calls) and the guard's decision logic from page
//! and component code.

pub mod amap;
pub mod guard;
pub mod live_weather;
pub mod session;
