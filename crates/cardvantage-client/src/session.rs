//! One user's working context: store, registry, orchestrator and the card
//! snapshot shown to the user.
//!
//! The snapshot is only refreshed from store change notifications
//! ([`Session::sync_changes`]) or at the start of a recommendation request.
//! Requests carry a ticket; a result whose ticket was overtaken by a newer
//! request is reported as [`SessionOutcome::Superseded`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::debug;

use crate::ClientResult;
use crate::cache::RecommendationCache;
use crate::cards::Card;
use crate::classifier::Classifier;
use crate::config::ClientConfig;
use crate::orchestrator::{
    MISSING_DOMAIN_MESSAGE, NoRecommendationReason, Orchestrator, RecommendationOutcome,
};
use crate::registry::CardRegistry;
use crate::site::{MerchantSignal, SiteOracle};
use crate::store::{CARDS_KEY, KeyValueStore, SqliteStore, StoreChange};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Presented {
        site: Option<MerchantSignal>,
        outcome: RecommendationOutcome,
    },
    /// A newer request was issued while this one was running.
    Superseded,
}

pub struct Session {
    registry: CardRegistry,
    orchestrator: Orchestrator,
    cards: RwLock<Vec<Card>>,
    changes: Mutex<Receiver<StoreChange>>,
    latest_request: AtomicU64,
}

impl Session {
    /// Opens the profile store named by `config` and wires the configured
    /// classifier.
    pub fn open(config: &ClientConfig) -> ClientResult<Self> {
        let store: Arc<dyn KeyValueStore> =
            Arc::new(SqliteStore::open_profile(config.home.as_deref())?);
        Self::new(store, config.classifier(), config.classifier_timeout)
    }

    pub fn new(
        store: Arc<dyn KeyValueStore>,
        classifier: Arc<dyn Classifier>,
        classifier_timeout: Duration,
    ) -> ClientResult<Self> {
        let changes = store.subscribe();
        let cache = Arc::new(RecommendationCache::new(Arc::clone(&store)));
        let registry = CardRegistry::new(store, Arc::clone(&cache));
        let orchestrator = Orchestrator::new(cache, classifier).with_timeout(classifier_timeout);
        let cards = registry.list()?;

        Ok(Self {
            registry,
            orchestrator,
            cards: RwLock::new(cards),
            changes: Mutex::new(changes),
            latest_request: AtomicU64::new(0),
        })
    }

    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<RecommendationCache> {
        self.orchestrator.cache()
    }

    /// The last loaded card list.
    pub fn cards(&self) -> Vec<Card> {
        self.cards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies pending store notifications. Returns whether the card
    /// snapshot was reloaded.
    pub fn sync_changes(&self) -> ClientResult<bool> {
        let mut reload = false;
        {
            let mut receiver = self.lock_changes();
            loop {
                match receiver.try_recv() {
                    Ok(change) => reload |= change.touches(CARDS_KEY),
                    Err(TryRecvError::Lagged(skipped)) => {
                        debug!(skipped, "store notifications lagged; reloading cards");
                        reload = true;
                    }
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
        }

        if reload {
            self.reload_cards()?;
        }
        Ok(reload)
    }

    /// Issues a new request ticket, superseding every earlier one.
    pub fn begin_request(&self) -> u64 {
        self.latest_request.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest_request.load(Ordering::SeqCst) == ticket
    }

    pub async fn recommend_current_site(
        &self,
        oracle: &dyn SiteOracle,
    ) -> ClientResult<SessionOutcome> {
        let ticket = self.begin_request();
        let Some(site) = oracle.current_site() else {
            return Ok(SessionOutcome::Presented {
                site: None,
                outcome: RecommendationOutcome::NoRecommendation {
                    reason: NoRecommendationReason::MissingDomain,
                    message: MISSING_DOMAIN_MESSAGE.to_string(),
                },
            });
        };

        let cards = self.reload_cards()?;
        let outcome = self
            .orchestrator
            .get_recommendation(&site.domain, &cards)
            .await;

        if !self.is_current(ticket) {
            debug!(domain = %site.domain, ticket, "discarding superseded recommendation");
            return Ok(SessionOutcome::Superseded);
        }
        Ok(SessionOutcome::Presented {
            site: Some(site),
            outcome,
        })
    }

    fn reload_cards(&self) -> ClientResult<Vec<Card>> {
        let cards = self.registry.list()?;
        *self.cards.write().unwrap_or_else(PoisonError::into_inner) = cards.clone();
        Ok(cards)
    }

    fn lock_changes(&self) -> MutexGuard<'_, Receiver<StoreChange>> {
        self.changes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
