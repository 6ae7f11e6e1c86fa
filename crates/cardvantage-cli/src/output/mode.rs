use crate::cli::{CacheCommand, CardCommand, Commands};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Card { command } => match command {
            CardCommand::List { json }
            | CardCommand::Add { json, .. }
            | CardCommand::Delete { json, .. } => *json,
        },
        Commands::Recommend { json, .. } => *json,
        Commands::Cache {
            command: CacheCommand::List { json },
        } => *json,
    };
    if json { OutputMode::Json } else { OutputMode::Text }
}
