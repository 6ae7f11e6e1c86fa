pub mod cache;
pub mod cards;
pub mod classifier;
pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod fallback;
pub mod fingerprint;
pub mod migrations;
pub mod orchestrator;
pub mod registry;
pub mod session;
pub mod setup;
pub mod site;
pub mod state;
pub mod store;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClassifierError, ClientError, ClientResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
