use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cardvantage_client::ClassifierError;
use cardvantage_client::classifier::Classifier;
use cardvantage_client::contracts::types::ClassifierRequest;
use serde_json::{Value, json};

/// Answers every call with the same scripted reply, optionally after a delay,
/// and records what it was asked.
pub struct ScriptedClassifier {
    reply: Result<Value, ClassifierError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ClassifierRequest>>,
}

impl ScriptedClassifier {
    pub fn replying(body: Value) -> Self {
        Self {
            reply: Ok(body),
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ClassifierError) -> Self {
        Self {
            reply: Err(error),
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ClassifierRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    fn id(&self) -> &'static str {
        "scripted"
    }

    async fn classify(&self, request: &ClassifierRequest) -> Result<Value, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

pub fn dining_reply(card_names: &[&str]) -> Value {
    let recommendations: Vec<Value> = card_names
        .iter()
        .map(|name| {
            json!({
                "cardName": name,
                "reason": format!("{name} earns extra on dining."),
                "rewardRate": "4x points",
            })
        })
        .collect();
    json!({
        "category": "Dining",
        "recommendations": recommendations,
    })
}
