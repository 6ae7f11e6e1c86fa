use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use crate::fingerprint::FINGERPRINT_SEPARATOR;

pub(crate) const CARD_ADD_HELP_COMMAND: &str = "cardvantage card add --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `cardvantage {cmd} --help` for usage."),
            None => "Run `cardvantage --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn card_name_invalid(name: &str, detail: &str) -> Self {
        Self::new(
            "card_name_invalid",
            &format!("Card name `{name}` cannot be saved: {detail}"),
            vec![
                "Use the card name printed on the card, e.g. `Chase Sapphire Reserve`.".to_string(),
                format!("Do not include the `{FINGERPRINT_SEPARATOR}` character."),
                format!("Run `{CARD_ADD_HELP_COMMAND}` for usage."),
            ],
        )
        .with_data(json!({
            "name": name,
        }))
    }

    pub fn reward_profile_invalid(detail: &str) -> Self {
        Self::new(
            "reward_profile_invalid",
            &format!("Reward profile is invalid: {detail}"),
            vec![
                "Reward rates must be finite numbers of zero or more.".to_string(),
                "Pass category rates as `--category-rate Dining=3`.".to_string(),
                format!("Run `{CARD_ADD_HELP_COMMAND}` for usage."),
            ],
        )
    }

    pub fn card_not_found(card_id: &str) -> Self {
        Self::new(
            "card_not_found",
            &format!("Card id `{card_id}` was not found."),
            vec![
                "Run `cardvantage card list` to find a valid card id.".to_string(),
                "Retry with `cardvantage card delete <card-id>`.".to_string(),
            ],
        )
        .with_data(json!({
            "card_id": card_id,
        }))
    }

    pub fn no_cards_available() -> Self {
        Self::new(
            "no_cards_available",
            "No recommendation is possible: no cards available.",
            vec![
                "Add a card first: `cardvantage card add \"Chase Sapphire Reserve\"`.".to_string(),
                "Then rerun `cardvantage recommend <url>`.".to_string(),
            ],
        )
    }

    pub fn missing_domain(input: &str) -> Self {
        Self::new(
            "missing_domain",
            &format!("Could not read a website domain from `{input}`."),
            vec![
                "Pass the address of the site you are shopping on, e.g. `https://www.doordash.com/`."
                    .to_string(),
                "A bare hostname such as `www.doordash.com` also works.".to_string(),
            ],
        )
        .with_data(json!({
            "input": input,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn store_failed(detail: &str) -> Self {
        Self::new(
            "internal_store_error",
            &format!("Profile storage failed: {detail}"),
            vec!["Retry the command.".to_string()],
        )
    }

    pub fn profile_init_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "profile_init_permission_denied",
            &format!("Cannot initialize profile at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `CARDVANTAGE_HOME` to a writable directory."
            )],
        )
    }

    pub fn profile_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "profile_locked",
            &format!("Profile database is locked at `{location}`."),
            vec![format!(
                "Close other processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn profile_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "profile_corrupt",
            &format!("Profile database appears corrupt at `{location}`."),
            vec![format!(
                "Move `{location}` aside; a fresh profile is created on the next run."
            )],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "migration_failed",
            &format!("Profile migration failed at `{location}`: {detail}"),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn profile_init_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "profile_init_failed",
            &format!("Profile initialization failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }

    pub fn is_internal(&self) -> bool {
        self.code.starts_with("internal_")
            || matches!(
                self.code.as_str(),
                "profile_init_permission_denied"
                    | "profile_locked"
                    | "profile_corrupt"
                    | "migration_failed"
                    | "profile_init_failed"
            )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Faults raised by the classifier layer.
///
/// These never reach callers of the orchestrator: every variant is logged and
/// downgraded to the local fallback.
#[derive(Debug, Clone, Error)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
    #[error("classifier timed out after {0} ms")]
    Timeout(u128),
    #[error("classifier returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl ClassifierError {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "classifier_unavailable",
            Self::Timeout(_) => "classifier_timeout",
            Self::InvalidResponse(_) => "classifier_invalid_response",
        }
    }
}
