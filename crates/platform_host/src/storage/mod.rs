//! Durable key-value contracts: namespaced app-state envelopes and lightweight preferences.

pub mod app_state;
pub mod prefs;
