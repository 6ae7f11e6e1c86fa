//! Turns a domain and a card set into a recommendation.
//!
//! The orchestrator never fails: classifier faults are logged and answered by
//! the local fallback, and an empty card set is reported as
//! [`RecommendationOutcome::NoRecommendation`].

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, warn};

use crate::cache::{FetchOutcome, RecommendationCache};
use crate::cards::{Card, card_names};
use crate::classifier::Classifier;
use crate::classifier::validate::validate_response;
use crate::config::DEFAULT_CLASSIFIER_TIMEOUT;
use crate::contracts::types::{ClassifierRequest, RecommendationResult, RecommendationSource};
use crate::error::ClassifierError;
use crate::fallback::classify_locally;
use crate::fingerprint::fingerprint;

pub const NO_CARDS_MESSAGE: &str = "No cards available. Add a card first to get recommendations.";
pub const MISSING_DOMAIN_MESSAGE: &str = "No website domain was provided.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoRecommendationReason {
    NoCards,
    MissingDomain,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationOutcome {
    Recommended {
        result: RecommendationResult,
        source: RecommendationSource,
        fingerprint: String,
    },
    NoRecommendation {
        reason: NoRecommendationReason,
        message: String,
    },
}

impl RecommendationOutcome {
    pub fn result(&self) -> Option<&RecommendationResult> {
        match self {
            Self::Recommended { result, .. } => Some(result),
            Self::NoRecommendation { .. } => None,
        }
    }

    pub fn source(&self) -> Option<RecommendationSource> {
        match self {
            Self::Recommended { source, .. } => Some(*source),
            Self::NoRecommendation { .. } => None,
        }
    }

    fn no_recommendation(reason: NoRecommendationReason) -> Self {
        let message = match reason {
            NoRecommendationReason::NoCards => NO_CARDS_MESSAGE,
            NoRecommendationReason::MissingDomain => MISSING_DOMAIN_MESSAGE,
        };
        Self::NoRecommendation {
            reason,
            message: message.to_string(),
        }
    }
}

pub struct Orchestrator {
    cache: Arc<RecommendationCache>,
    classifier: Arc<dyn Classifier>,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(cache: Arc<RecommendationCache>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            cache,
            classifier,
            timeout: DEFAULT_CLASSIFIER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(&self) -> &Arc<RecommendationCache> {
        &self.cache
    }

    pub async fn get_recommendation(&self, domain: &str, cards: &[Card]) -> RecommendationOutcome {
        if cards.is_empty() {
            return RecommendationOutcome::no_recommendation(NoRecommendationReason::NoCards);
        }
        let domain = domain.trim();
        if domain.is_empty() {
            return RecommendationOutcome::no_recommendation(
                NoRecommendationReason::MissingDomain,
            );
        }

        let key = fingerprint(domain, cards);
        if let Some(result) = self.cache.get(&key) {
            debug!(domain = %domain, "recommendation served from cache");
            return RecommendationOutcome::Recommended {
                result,
                source: RecommendationSource::Cache,
                fingerprint: key,
            };
        }

        match self.fetch_remote(domain, cards, &key).await {
            Ok(result) => RecommendationOutcome::Recommended {
                result,
                source: RecommendationSource::Classifier,
                fingerprint: key,
            },
            Err(error) => {
                warn!(
                    domain = %domain,
                    classifier = self.classifier.id(),
                    fault = error.kind(),
                    error = %error,
                    "classifier failed; using local fallback"
                );
                RecommendationOutcome::Recommended {
                    result: classify_locally(domain, cards),
                    source: RecommendationSource::Fallback,
                    fingerprint: key,
                }
            }
        }
    }

    /// Concurrent callers with the same fingerprint share one classifier
    /// call. The shared call writes the cache before it resolves, so the
    /// pending entry outlives the write.
    async fn fetch_remote(&self, domain: &str, cards: &[Card], key: &str) -> FetchOutcome {
        let epoch = self.cache.epoch();
        let request = ClassifierRequest::new(domain, &card_names(cards));
        let classifier = Arc::clone(&self.classifier);
        let cache = Arc::clone(&self.cache);
        let cache_key = key.to_string();
        let timeout = self.timeout;

        let (outcome, _role) = self
            .cache
            .in_flight()
            .run(key, move || {
                async move {
                    let outcome =
                        classify_with_timeout(classifier.as_ref(), &request, timeout).await;
                    if let Ok(result) = &outcome {
                        store_if_current(&cache, &cache_key, result, epoch, &request.website_url);
                    }
                    outcome
                }
                .boxed()
            })
            .await;
        outcome
    }
}

fn store_if_current(
    cache: &RecommendationCache,
    key: &str,
    result: &RecommendationResult,
    epoch: u64,
    domain: &str,
) {
    match cache.put_if_current(key, result, epoch) {
        Ok(true) => debug!(domain = %domain, "cached classifier result"),
        Ok(false) => {}
        Err(error) => {
            warn!(code = %error.code, error = %error, "failed to cache classifier result");
        }
    }
}

async fn classify_with_timeout(
    classifier: &dyn Classifier,
    request: &ClassifierRequest,
    timeout: Duration,
) -> FetchOutcome {
    let raw = match tokio::time::timeout(timeout, classifier.classify(request)).await {
        Ok(raw) => raw?,
        Err(_) => return Err(ClassifierError::Timeout(timeout.as_millis())),
    };
    validate_response(&raw, &request.card_names())
}
