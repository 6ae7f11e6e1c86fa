use cardvantage_client::commands::cards::{self, CardAddOptions};
use cardvantage_client::commands::recommend::{self, RecommendOptions};
use cardvantage_client::commands::cache;
use cardvantage_client::config::ClientConfig;
use cardvantage_client::{ClientResult, SuccessEnvelope};

use crate::cli::{CacheCommand, CardCommand, Cli, Commands};

pub async fn dispatch(cli: &Cli, config: &ClientConfig) -> ClientResult<SuccessEnvelope> {
    let home = config.home.as_deref();
    match &cli.command {
        Commands::Card { command } => match command {
            CardCommand::List { .. } => cards::list_with_home_override(home),
            CardCommand::Add {
                name,
                base_rate,
                category_rates,
                rotating_categories,
                json: _,
            } => {
                let options = CardAddOptions {
                    name: name.clone(),
                    base_rate: *base_rate,
                    category_rates: category_rates.clone(),
                    rotating_categories: rotating_categories.clone(),
                };
                cards::add_with_home_override(&options, home)
            }
            CardCommand::Delete { card_id, .. } => cards::delete_with_home_override(card_id, home),
        },
        Commands::Recommend { url, title, .. } => {
            recommend::run(&RecommendOptions {
                url: url.clone(),
                title: title.clone(),
                config: config.clone(),
            })
            .await
        }
        Commands::Cache { command } => match command {
            CacheCommand::List { .. } => cache::list_with_home_override(home),
        },
    }
}
