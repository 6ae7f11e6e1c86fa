//! Deterministic local substitute for the remote classifier.
//!
//! [`classify_locally`] is a pure function of its inputs: the category comes
//! from the ordered keyword table, and each card's rate from its own reward
//! profile, the built-in catalog, or the universal default.

pub mod catalog;
pub mod keywords;

use crate::cards::Card;
use crate::contracts::types::{MAX_RECOMMENDATIONS, Recommendation, RecommendationResult};

pub use catalog::resolve_profile;
pub use keywords::{GENERAL_CATEGORY, category_for_domain};

/// Flat bonus assumed for a rotating category.
pub const ROTATING_BONUS_RATE: f64 = 5.0;
/// Rate assumed for a card with no reward data at all.
pub const DEFAULT_RATE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateRule {
    CategoryMatch,
    RotatingCategory,
    BaseRate,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveRate {
    pub rate: f64,
    pub rule: RateRule,
}

pub fn effective_rate(card: &Card, category: &str) -> EffectiveRate {
    let Some(profile) = resolve_profile(card) else {
        return EffectiveRate {
            rate: DEFAULT_RATE,
            rule: RateRule::Default,
        };
    };

    if let Some(rate) = profile.category_rates.get(category) {
        return EffectiveRate {
            rate: *rate,
            rule: RateRule::CategoryMatch,
        };
    }
    if profile.rotating_categories.contains(category) {
        return EffectiveRate {
            rate: ROTATING_BONUS_RATE,
            rule: RateRule::RotatingCategory,
        };
    }
    EffectiveRate {
        rate: profile.base_rate,
        rule: RateRule::BaseRate,
    }
}

/// Recommends the card(s) with the highest effective rate for `domain`.
///
/// Tied cards are all kept, up to three, in input order. Callers must pass at
/// least one card; the result then always holds at least one recommendation.
pub fn classify_locally(domain: &str, cards: &[Card]) -> RecommendationResult {
    let category = category_for_domain(domain);
    let rated: Vec<(&Card, EffectiveRate)> = cards
        .iter()
        .map(|card| (card, effective_rate(card, category)))
        .collect();

    let best = rated
        .iter()
        .map(|(_, effective)| effective.rate)
        .fold(f64::NEG_INFINITY, f64::max);

    let recommendations = rated
        .iter()
        .filter(|(_, effective)| effective.rate == best)
        .take(MAX_RECOMMENDATIONS)
        .map(|(card, effective)| Recommendation {
            card_name: card.name.clone(),
            reason: reason_for(card, category, *effective),
            reward_rate: format_rate(effective.rate),
        })
        .collect();

    RecommendationResult {
        category: category.to_string(),
        recommendations,
    }
}

pub fn format_rate(rate: f64) -> String {
    format!("{rate:.1}x")
}

fn reason_for(card: &Card, category: &str, effective: EffectiveRate) -> String {
    let name = &card.name;
    let rate = effective.rate;
    match effective.rule {
        RateRule::CategoryMatch => {
            format!("{category} category match: {name} earns {rate:.1}x on {category} purchases.")
        }
        RateRule::RotatingCategory => format!(
            "Rotating category match: {name} earns {rate:.1}x on {category} while the quarterly bonus is active."
        ),
        RateRule::BaseRate => {
            format!("Base rate: {name} earns {rate:.1}x on {category} purchases.")
        }
        RateRule::Default => {
            format!("Default rate: no reward data for {name}, assuming {rate:.1}x.")
        }
    }
}
