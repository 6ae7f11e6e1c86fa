use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A card saved by the user. Only `name` is ever sent to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub date_added: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_profile: Option<RewardProfile>,
}

impl Card {
    /// Builds a name-only card, the shape most saved cards have.
    pub fn named(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            date_added: String::new(),
            reward_profile: None,
        }
    }

    pub fn with_reward_profile(mut self, reward_profile: RewardProfile) -> Self {
        self.reward_profile = Some(reward_profile);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardProfile {
    pub base_rate: f64,
    #[serde(default)]
    pub category_rates: BTreeMap<String, f64>,
    #[serde(default)]
    pub rotating_categories: BTreeSet<String>,
}

impl RewardProfile {
    pub fn with_base_rate(base_rate: f64) -> Self {
        Self {
            base_rate,
            category_rates: BTreeMap::new(),
            rotating_categories: BTreeSet::new(),
        }
    }

    pub fn category_rate(mut self, category: &str, rate: f64) -> Self {
        self.category_rates.insert(category.to_string(), rate);
        self
    }

    pub fn rotating(mut self, category: &str) -> Self {
        self.rotating_categories.insert(category.to_string());
        self
    }

    /// Returns the first rate that is negative or not finite, if any.
    pub(crate) fn first_invalid_rate(&self) -> Option<(String, f64)> {
        let valid = |rate: f64| rate.is_finite() && rate >= 0.0;
        if !valid(self.base_rate) {
            return Some(("base".to_string(), self.base_rate));
        }
        self.category_rates
            .iter()
            .find(|(_, rate)| !valid(**rate))
            .map(|(category, rate)| (category.clone(), *rate))
    }
}

pub fn card_names(cards: &[Card]) -> Vec<String> {
    cards.iter().map(|card| card.name.clone()).collect()
}
