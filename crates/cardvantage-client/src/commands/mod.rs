pub mod cache;
pub mod cards;
pub mod recommend;

use std::path::Path;
use std::sync::Arc;

use crate::ClientResult;
use crate::cache::RecommendationCache;
use crate::registry::CardRegistry;
use crate::store::{KeyValueStore, SqliteStore};

/// Opens the profile store and the cache and registry that share it.
pub(crate) fn open_registry(
    home_override: Option<&Path>,
) -> ClientResult<(CardRegistry, Arc<RecommendationCache>)> {
    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open_profile(home_override)?);
    let cache = Arc::new(RecommendationCache::new(Arc::clone(&store)));
    let registry = CardRegistry::new(store, Arc::clone(&cache));
    Ok((registry, cache))
}
