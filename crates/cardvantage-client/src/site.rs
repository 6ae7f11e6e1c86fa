use serde::Serialize;
use url::Url;

use crate::{ClientError, ClientResult};

/// The page the shopper is on. Derived per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSignal {
    pub domain: String,
    pub full_url: String,
    pub title: String,
}

impl MerchantSignal {
    /// Accepts full URLs and bare hostnames (`www.doordash.com`).
    pub fn from_url(input: &str, title: &str) -> ClientResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ClientError::missing_domain(input));
        }

        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        let parsed = Url::parse(&candidate).map_err(|_| ClientError::missing_domain(input))?;
        let domain = parsed
            .host_str()
            .map(str::to_ascii_lowercase)
            .filter(|host| !host.is_empty())
            .ok_or_else(|| ClientError::missing_domain(input))?;

        Ok(Self {
            domain,
            full_url: parsed.to_string(),
            title: title.to_string(),
        })
    }
}

/// Answers "which site is the shopper on right now".
pub trait SiteOracle: Send + Sync {
    fn current_site(&self) -> Option<MerchantSignal>;
}

/// An oracle pinned to one site, or to none.
#[derive(Debug, Clone, Default)]
pub struct StaticSite {
    site: Option<MerchantSignal>,
}

impl StaticSite {
    pub fn new(site: MerchantSignal) -> Self {
        Self { site: Some(site) }
    }

    pub fn none() -> Self {
        Self { site: None }
    }
}

impl SiteOracle for StaticSite {
    fn current_site(&self) -> Option<MerchantSignal> {
        self.site.clone()
    }
}
