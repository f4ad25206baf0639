// src/lib.rs

pub mod api;
pub mod config;
pub mod notify;
pub mod queue;
pub mod roster;
pub mod sheets;
pub mod state;

pub use state::AppState;
