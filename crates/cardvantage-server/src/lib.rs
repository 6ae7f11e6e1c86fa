pub mod api;
pub mod config;
pub mod error;
pub mod inference;
mod main_lib;
pub mod prompt;
pub mod repair;

pub use main_lib::{AppState, build_state, init_tracing};
