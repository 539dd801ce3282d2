//! Application assembly for the Roster backend.
//!
//! The binary in `main.rs` only loads configuration, installs logging and
//! serves the router built here; tests drive the same router directly.

pub mod app;
pub mod app_state;

pub use app::build_app;
pub use app_state::AppState;
