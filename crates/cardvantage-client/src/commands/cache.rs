use std::path::Path;

use crate::ClientResult;
use crate::commands::open_registry;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::CacheListData;

pub fn list() -> ClientResult<SuccessEnvelope> {
    list_with_home_override(None)
}

#[doc(hidden)]
pub fn list_with_home_override(home_override: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let (_registry, cache) = open_registry(home_override)?;
    let entries = cache.entries()?;
    success("cache list", CacheListData { entries })
}
