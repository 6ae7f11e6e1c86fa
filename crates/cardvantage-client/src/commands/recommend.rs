use crate::config::ClientConfig;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::RecommendData;
use crate::orchestrator::{NoRecommendationReason, RecommendationOutcome};
use crate::session::{Session, SessionOutcome};
use crate::site::{MerchantSignal, StaticSite};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendOptions {
    pub url: String,
    pub title: Option<String>,
    pub config: ClientConfig,
}

/// Recommends cards for one site. Classifier faults never fail the command;
/// only an empty card list or an unreadable URL do.
pub async fn run(options: &RecommendOptions) -> ClientResult<SuccessEnvelope> {
    let site = MerchantSignal::from_url(&options.url, options.title.as_deref().unwrap_or(""))?;
    let session = Session::open(&options.config)?;
    let outcome = session
        .recommend_current_site(&StaticSite::new(site))
        .await?;

    match outcome {
        SessionOutcome::Presented {
            site: Some(site),
            outcome:
                RecommendationOutcome::Recommended {
                    result,
                    source,
                    fingerprint,
                },
        } => success(
            "recommend",
            RecommendData {
                site,
                source,
                fingerprint,
                result,
            },
        ),
        SessionOutcome::Presented {
            outcome:
                RecommendationOutcome::NoRecommendation {
                    reason: NoRecommendationReason::NoCards,
                    ..
                },
            ..
        } => Err(ClientError::no_cards_available()),
        SessionOutcome::Presented { .. } => Err(ClientError::missing_domain(&options.url)),
        SessionOutcome::Superseded => Err(ClientError::new(
            "internal_request_superseded",
            "The recommendation request was superseded by a newer one.",
            vec!["Retry the command.".to_string()],
        )),
    }
}
