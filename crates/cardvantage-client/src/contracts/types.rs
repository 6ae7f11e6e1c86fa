use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::site::MerchantSignal;

/// Maximum number of recommendations in one result.
pub const MAX_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub card_name: String,
    pub reason: String,
    pub reward_rate: String,
}

/// Holds between one and [`MAX_RECOMMENDATIONS`] entries, each naming a card
/// from the set that produced the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub category: String,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRef {
    pub name: String,
}

/// Body of `POST /api/get-recommendation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierRequest {
    pub website_url: String,
    pub user_cards: Vec<CardRef>,
}

impl ClassifierRequest {
    pub fn new(website_url: &str, card_names: &[String]) -> Self {
        Self {
            website_url: website_url.to_string(),
            user_cards: card_names
                .iter()
                .map(|name| CardRef { name: name.clone() })
                .collect(),
        }
    }

    pub fn card_names(&self) -> Vec<String> {
        self.user_cards.iter().map(|card| card.name.clone()).collect()
    }
}

/// Failure body returned by the classifier endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub key: String,
    pub value: RecommendationResult,
    pub stored_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardsData {
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardChangeData {
    pub card: Card,
    pub card_count: usize,
    pub cache_entries_invalidated: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Cache,
    Classifier,
    Fallback,
}

impl RecommendationSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Classifier => "classifier",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendData {
    pub site: MerchantSignal,
    pub source: RecommendationSource,
    pub fingerprint: String,
    pub result: RecommendationResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct CachedRecommendation {
    pub fingerprint: String,
    pub domain: String,
    pub card_names: Vec<String>,
    pub stored_at: String,
    pub result: RecommendationResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheListData {
    pub entries: Vec<CachedRecommendation>,
}
