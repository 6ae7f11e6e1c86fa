mod support;

use std::sync::Arc;
use std::time::Duration;

use cardvantage_client::contracts::types::RecommendationSource;
use cardvantage_client::session::{Session, SessionOutcome};
use cardvantage_client::site::{MerchantSignal, StaticSite};
use cardvantage_client::store::{KeyValueStore, SqliteStore};
use support::fake_classifier::{ScriptedClassifier, dining_reply};
use support::temp_home_in_tmp;

fn site(url: &str) -> Option<StaticSite> {
    MerchantSignal::from_url(url, "").ok().map(StaticSite::new)
}

#[tokio::test]
async fn later_request_supersedes_earlier_one() {
    let temp = temp_home_in_tmp("cardvantage-session");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let store = SqliteStore::open_profile(Some(&home));
        assert!(store.is_ok());
        let Ok(store) = store else {
            return;
        };
        let store: Arc<dyn KeyValueStore> = Arc::new(store);
        let classifier = Arc::new(
            ScriptedClassifier::replying(dining_reply(&["Amex Gold"]))
                .with_delay(Duration::from_millis(100)),
        );
        let session = Session::new(store, classifier, Duration::from_secs(2));
        assert!(session.is_ok());
        let Ok(session) = session else {
            return;
        };
        assert!(session.registry().add("Amex Gold", None).is_ok());

        let (Some(doordash), Some(example)) = (
            site("https://www.doordash.com/store/1"),
            site("www.example.org"),
        ) else {
            return;
        };

        let (stale, fresh) = tokio::join!(session.recommend_current_site(&doordash), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            session.recommend_current_site(&example).await
        });

        assert!(matches!(stale, Ok(SessionOutcome::Superseded)));
        assert!(matches!(fresh, Ok(SessionOutcome::Presented { .. })));
        if let Ok(SessionOutcome::Presented { site, outcome }) = fresh {
            assert_eq!(site.map(|site| site.domain), Some("www.example.org".to_string()));
            assert!(outcome.source().is_some());
        }
    }
}

#[tokio::test]
async fn request_rereads_cards_saved_by_another_handle() {
    let temp = temp_home_in_tmp("cardvantage-session");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let config = cardvantage_client::config::ClientConfig {
            home: Some(home.clone()),
            classifier_url: None,
            ..Default::default()
        };
        let session = Session::open(&config);
        assert!(session.is_ok());
        let Ok(session) = session else {
            return;
        };
        assert!(session.cards().is_empty());

        // A second process writing to the same profile.
        let other = Session::open(&config);
        assert!(other.is_ok());
        if let Ok(other) = other {
            assert!(other.registry().add("Chase Sapphire Reserve", None).is_ok());
        }

        let Some(doordash) = site("www.doordash.com") else {
            return;
        };
        let outcome = session.recommend_current_site(&doordash).await;
        assert!(matches!(outcome, Ok(SessionOutcome::Presented { .. })));
        if let Ok(SessionOutcome::Presented { outcome, .. }) = outcome {
            assert_eq!(outcome.source(), Some(RecommendationSource::Fallback));
            assert_eq!(
                outcome.result().map(|result| result.category.as_str()),
                Some("Dining")
            );
        }
        assert_eq!(session.cards().len(), 1);
    }
}
