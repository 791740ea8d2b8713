//! Durable workspace storage and lightweight preference contracts.

pub mod app_state;
pub mod prefs;
