use clap::{Parser, Subcommand};

pub fn parse_rate(value: &str) -> Result<f64, String> {
    let rate = value
        .trim()
        .parse::<f64>()
        .map_err(|_| "rate must be a number such as 1.5".to_string())?;
    if !rate.is_finite() || rate < 0.0 {
        return Err("rate must be a finite number of zero or more".to_string());
    }
    Ok(rate)
}

/// Extended help shown after `cardvantage card add --help`.
pub const CARD_ADD_AFTER_HELP: &str = "\
How reward data is used:
  Cards usually need only a name. When the remote classifier is unreachable,
  the local fallback looks the name up in a built-in catalog of well-known
  cards (e.g. `Chase Sapphire Reserve`, `Citi Double Cash`, `Amex Gold`).

  Pass reward flags to describe a card the catalog does not know, or to
  override what it assumes:
    --base-rate 1.5                 Rate earned on every purchase
    --category-rate Dining=3        Rate for one category (repeatable)
    --rotating Groceries            Category with a rotating 5x bonus (repeatable)

  Categories: Dining, Travel, Groceries, Online Shopping, Gas,
  Entertainment, Drugstores, Office, General.

Examples:
  cardvantage card add \"Chase Sapphire Reserve\"
  cardvantage card add \"Credit Union Visa\" --base-rate 1.5 --category-rate Gas=3
";

#[derive(Debug, Parser)]
#[command(
    name = "cardvantage",
    version,
    about = "pick the best credit card for the site you are shopping on",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage your saved cards
    #[command(arg_required_else_help = true)]
    Card {
        #[command(subcommand)]
        command: CardCommand,
    },
    /// Recommend a card for a website
    Recommend {
        /// Site address or bare hostname, e.g. https://www.doordash.com/
        url: String,
        /// Page title, used only for display
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Inspect cached recommendations
    #[command(arg_required_else_help = true)]
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CardCommand {
    /// List saved cards
    List {
        #[arg(long)]
        json: bool,
    },
    /// Save a card
    #[command(after_help = CARD_ADD_AFTER_HELP)]
    Add {
        /// Card name as printed on the card
        name: String,
        #[arg(long, value_parser = parse_rate)]
        base_rate: Option<f64>,
        /// CATEGORY=RATE, repeatable
        #[arg(long = "category-rate", value_name = "CATEGORY=RATE")]
        category_rates: Vec<String>,
        /// Category with a rotating bonus, repeatable
        #[arg(long = "rotating", value_name = "CATEGORY")]
        rotating_categories: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Delete a saved card by id
    Delete {
        card_id: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CacheCommand {
    /// List cached recommendations
    List {
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
