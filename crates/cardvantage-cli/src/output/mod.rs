mod cache_text;
mod cards_text;
mod error_text;
mod format;
mod json;
mod mode;
mod recommend_text;

use std::io;

use cardvantage_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "card list" => cards_text::render_card_list(&success.data),
        "card add" => cards_text::render_card_added(&success.data),
        "card delete" => cards_text::render_card_deleted(&success.data),
        "recommend" => recommend_text::render_recommendation(&success.data),
        "cache list" => cache_text::render_cache_list(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
