mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use cardvantage_client::ClientError;
use cardvantage_client::config::ClientConfig;
use clap::{Parser, error::ErrorKind};
use stdout_io::write_stdout_text;
use tracing_subscriber::EnvFilter;

const ROOT_HELP: &str = "CardVantage - the best card for the site you are on

Usage:
  cardvantage <command>

Start here:
  cardvantage card add \"Chase Sapphire Reserve\"
  cardvantage recommend https://www.doordash.com/
";

const TOP_LEVEL_HELP: &str = "CardVantage - the best card for the site you are on

USAGE: cardvantage <command>

Save the cards in your wallet:
  cardvantage card add <name>                             Save a card (see `card add --help` for reward flags)
  cardvantage card list                                   Show saved cards and their ids
  cardvantage card delete <card-id>                       Remove a saved card

Get a recommendation:
  cardvantage recommend <url>                             Best card for a website, e.g. www.doordash.com
  cardvantage recommend <url> --json                      Same result as a JSON envelope

Inspect what is remembered:
  cardvantage cache list                                  Cached recommendations for the current cards

Recommendations come from the remote classifier at CARDVANTAGE_CLASSIFIER_URL
(default http://localhost:8080). When it is unreachable or slow, a local
keyword classifier answers instead. Set CARDVANTAGE_CLASSIFIER_URL=off to
always use the local classifier.

Run `cardvantage <command> --help` for command usage.
";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(code) => code,
        Err(code) => code,
    }
}

/// Diagnostics go to stderr so stdout stays a clean rendering surface.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => return Err(report_parse_error(&err, &raw_args)),
    };
    let mode = output::mode_for_command(&cli.command);
    let config = ClientConfig::from_env();
    tracing::debug!(
        home = ?config.home,
        classifier_url = ?config.classifier_url,
        "dispatching command"
    );

    match dispatch::dispatch(&cli, &config).await {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

/// Help and version requests are successes; everything else clap rejects is
/// rendered through the normal failure envelope.
fn report_parse_error(err: &clap::Error, raw_args: &[String]) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let text = if is_top_level_help_request(raw_args) {
                TOP_LEVEL_HELP.to_string()
            } else {
                err.to_string()
            };
            if write_stdout_text(&text).is_err() {
                return ExitCode::from(2);
            }
            return ExitCode::SUCCESS;
        }
        ErrorKind::DisplayVersion => {
            if write_stdout_text(&err.to_string()).is_err() {
                return ExitCode::from(2);
            }
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let command_hint = if matches!(
        err.kind(),
        ErrorKind::MissingRequiredArgument
            | ErrorKind::InvalidValue
            | ErrorKind::ValueValidation
            | ErrorKind::WrongNumberOfValues
            | ErrorKind::UnknownArgument
            | ErrorKind::InvalidSubcommand
    ) {
        command_path_from_args(raw_args)
    } else {
        None
    };
    let clean_message = strip_clap_boilerplate(&err.to_string());
    let parse_error = parse_error_with_command_hint(&clean_message, command_hint.as_deref());
    let mode = infer_requested_output_mode(raw_args);
    if output::print_failure(&parse_error, mode).is_err() {
        return ExitCode::from(2);
    }
    ExitCode::from(1)
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Drops clap's usage footer; the recovery steps replace it.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let words: Vec<&str> = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect();

    let hint = match words.as_slice() {
        ["card", "add", ..] => "card add",
        ["card", "delete", ..] => "card delete",
        ["card", "list", ..] => "card list",
        ["card", ..] => "card",
        ["recommend", ..] => "recommend",
        ["cache", "list", ..] => "cache list",
        ["cache", ..] => "cache",
        _ => return None,
    };
    Some(hint.to_string())
}

fn parse_error_with_command_hint(clean_message: &str, command_hint: Option<&str>) -> ClientError {
    if command_hint == Some("recommend") && clean_message.contains("unexpected argument") {
        return ClientError::invalid_argument_with_recovery(
            "The site address must be a single argument.",
            vec![
                "Quote the address: `cardvantage recommend \"https://www.doordash.com/\"`."
                    .to_string(),
                "Run `cardvantage recommend --help` for command usage.".to_string(),
            ],
        );
    }

    if command_hint == Some("card add") && clean_message.contains("unexpected argument") {
        return ClientError::invalid_argument_with_recovery(
            "Card names with spaces must be quoted.",
            vec![
                "Quote the name: `cardvantage card add \"Chase Sapphire Reserve\"`.".to_string(),
                "Run `cardvantage card add --help` for reward flags.".to_string(),
            ],
        );
    }

    ClientError::invalid_argument_for_command(clean_message, command_hint)
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if error.is_internal() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}
