use std::path::Path;

use crate::ClientError;
use crate::ClientResult;
use crate::cards::RewardProfile;
use crate::commands::open_registry;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{CardChangeData, CardsData};
use crate::fallback::DEFAULT_RATE;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardAddOptions {
    pub name: String,
    pub base_rate: Option<f64>,
    /// Raw `CATEGORY=RATE` pairs.
    pub category_rates: Vec<String>,
    pub rotating_categories: Vec<String>,
}

impl CardAddOptions {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// `None` when no reward flag was given, so the built-in catalog applies.
    pub fn reward_profile(&self) -> ClientResult<Option<RewardProfile>> {
        if self.base_rate.is_none()
            && self.category_rates.is_empty()
            && self.rotating_categories.is_empty()
        {
            return Ok(None);
        }

        let mut profile = RewardProfile::with_base_rate(self.base_rate.unwrap_or(DEFAULT_RATE));
        for raw in &self.category_rates {
            let (category, rate) = parse_category_rate(raw)?;
            profile = profile.category_rate(&category, rate);
        }
        for category in &self.rotating_categories {
            let category = category.trim();
            if category.is_empty() {
                return Err(ClientError::invalid_argument_for_command(
                    "`--rotating` needs a category name.",
                    Some("card add"),
                ));
            }
            profile = profile.rotating(category);
        }
        Ok(Some(profile))
    }
}

pub fn list() -> ClientResult<SuccessEnvelope> {
    list_with_home_override(None)
}

#[doc(hidden)]
pub fn list_with_home_override(home_override: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let (registry, _cache) = open_registry(home_override)?;
    let cards = registry.list()?;
    success("card list", CardsData { cards })
}

pub fn add(options: &CardAddOptions) -> ClientResult<SuccessEnvelope> {
    add_with_home_override(options, None)
}

#[doc(hidden)]
pub fn add_with_home_override(
    options: &CardAddOptions,
    home_override: Option<&Path>,
) -> ClientResult<SuccessEnvelope> {
    let reward_profile = options.reward_profile()?;
    let (registry, _cache) = open_registry(home_override)?;
    let mutation = registry.add(&options.name, reward_profile)?;
    success(
        "card add",
        CardChangeData {
            card: mutation.card,
            card_count: mutation.card_count,
            cache_entries_invalidated: mutation.cache_entries_invalidated,
        },
    )
}

pub fn delete(card_id: &str) -> ClientResult<SuccessEnvelope> {
    delete_with_home_override(card_id, None)
}

#[doc(hidden)]
pub fn delete_with_home_override(
    card_id: &str,
    home_override: Option<&Path>,
) -> ClientResult<SuccessEnvelope> {
    let card_id = card_id.trim();
    if card_id.is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "A card id is required.",
            Some("card delete"),
        ));
    }
    let (registry, _cache) = open_registry(home_override)?;
    let mutation = registry.delete(card_id)?;
    success(
        "card delete",
        CardChangeData {
            card: mutation.card,
            card_count: mutation.card_count,
            cache_entries_invalidated: mutation.cache_entries_invalidated,
        },
    )
}

fn parse_category_rate(raw: &str) -> ClientResult<(String, f64)> {
    let malformed = || {
        ClientError::reward_profile_invalid(&format!(
            "`{raw}` is not a `CATEGORY=RATE` pair"
        ))
    };
    let (category, rate) = raw.split_once('=').ok_or_else(malformed)?;
    let category = category.trim();
    if category.is_empty() {
        return Err(malformed());
    }
    let rate = rate.trim().parse::<f64>().map_err(|_| malformed())?;
    Ok((category.to_string(), rate))
}
