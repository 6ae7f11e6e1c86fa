use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};
use ulid::Ulid;

use crate::cache::RecommendationCache;
use crate::cards::{Card, RewardProfile};
use crate::fingerprint::FINGERPRINT_SEPARATOR;
use crate::store::{CARDS_KEY, KeyValueStore, get_one, now_timestamp, set_one};
use crate::{ClientError, ClientResult};

/// The user's saved cards, persisted under the `cards` key.
///
/// Every add or delete invalidates the whole recommendation cache.
pub struct CardRegistry {
    store: Arc<dyn KeyValueStore>,
    cache: Arc<RecommendationCache>,
}

#[derive(Debug, Clone)]
pub struct CardMutation {
    pub card: Card,
    pub card_count: usize,
    pub cache_entries_invalidated: usize,
}

impl CardRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>, cache: Arc<RecommendationCache>) -> Self {
        Self { store, cache }
    }

    /// Reads the current list from the store on every call.
    pub fn list(&self) -> ClientResult<Vec<Card>> {
        let stored = get_one(self.store.as_ref(), CARDS_KEY)?;
        Ok(parse_cards(stored))
    }

    pub fn add(&self, name: &str, reward_profile: Option<RewardProfile>) -> ClientResult<CardMutation> {
        let name = validate_name(name)?;
        if let Some((category, rate)) = reward_profile
            .as_ref()
            .and_then(RewardProfile::first_invalid_rate)
        {
            return Err(ClientError::reward_profile_invalid(&format!(
                "{category} rate {rate} must be a finite number of zero or more"
            )));
        }

        let card = Card {
            id: format!("card_{}", Ulid::new()),
            name,
            date_added: now_timestamp(),
            reward_profile,
        };

        let mut cards = self.list()?;
        cards.push(card.clone());
        self.persist(&cards)?;
        let invalidated = self.invalidate_cache();

        info!(card = %card.name, card_count = cards.len(), "card added");
        Ok(CardMutation {
            card,
            card_count: cards.len(),
            cache_entries_invalidated: invalidated,
        })
    }

    pub fn delete(&self, card_id: &str) -> ClientResult<CardMutation> {
        let mut cards = self.list()?;
        let position = cards
            .iter()
            .position(|card| card.id == card_id)
            .ok_or_else(|| ClientError::card_not_found(card_id))?;
        let card = cards.remove(position);
        self.persist(&cards)?;
        let invalidated = self.invalidate_cache();

        info!(card = %card.name, card_count = cards.len(), "card deleted");
        Ok(CardMutation {
            card,
            card_count: cards.len(),
            cache_entries_invalidated: invalidated,
        })
    }

    /// The card list is already saved here, so a failed invalidation is
    /// logged and reported as zero entries rather than failing the command.
    fn invalidate_cache(&self) -> usize {
        match self.cache.invalidate_all() {
            Ok(invalidated) => invalidated,
            Err(error) => {
                warn!(code = %error.code, error = %error, "failed to invalidate cached recommendations");
                0
            }
        }
    }

    fn persist(&self, cards: &[Card]) -> ClientResult<()> {
        let value = serde_json::to_value(cards)
            .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
        set_one(self.store.as_ref(), CARDS_KEY, value)
    }
}

/// A missing key is an empty list; unreadable entries are skipped.
pub(crate) fn parse_cards(stored: Option<Value>) -> Vec<Card> {
    let items = match stored {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            warn!("stored cards value is not a list; treating as empty");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Card>(item) {
            Ok(card) => Some(card),
            Err(error) => {
                warn!(index, error = %error, "skipping unreadable stored card");
                None
            }
        })
        .collect()
}

fn validate_name(name: &str) -> ClientResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ClientError::card_name_invalid(name, "the name is empty"));
    }
    if trimmed.contains(FINGERPRINT_SEPARATOR) {
        return Err(ClientError::card_name_invalid(
            name,
            &format!("the name contains `{FINGERPRINT_SEPARATOR}`"),
        ));
    }
    Ok(trimmed.to_string())
}
