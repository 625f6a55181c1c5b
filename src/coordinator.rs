//! Drives one research request through submit, wait and fetch, and keeps
//! track of every object it created so they can be torn down later.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info, warn};
use serde_json::Value;

use crate::audit::AuditLog;
use crate::clock::MonotonicClock;
use crate::config::Config;
use crate::consts::{DEFAULT_FETCH_DELAY, GOAL_PREFIX, NO_RESULTS, OBJECT_PREFIX};
use crate::error::{Error, Result};
use crate::registry::ObjectRegistry;
use crate::store::http::HttpTransport;
use crate::store::{DeleteOutcome, StoreClient};

/// A finished research request.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// `text_value` from the fetched object, or [`NO_RESULTS`].
    pub text: String,
    /// The whole fetch response.
    pub raw: Value,
}

/// Wrap a question in the instruction template sent as the goal.
pub fn build_goal(question: &str) -> String {
    format!("{GOAL_PREFIX}{}", question.trim())
}

/// Generates `research_<millis>` names, unique within the process.
#[derive(Debug, Default)]
pub struct NameGenerator {
    clock: MonotonicClock,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> String {
        format!("{OBJECT_PREFIX}_{}", self.clock.next())
    }
}

pub struct Coordinator {
    store: StoreClient,
    registry: ObjectRegistry,
    names: NameGenerator,
    fetch_delay: Duration,
    last: Mutex<Option<Answer>>,
}

impl Coordinator {
    pub fn new(store: StoreClient) -> Self {
        Self {
            store,
            registry: ObjectRegistry::new(),
            names: NameGenerator::new(),
            fetch_delay: DEFAULT_FETCH_DELAY,
            last: Mutex::new(None),
        }
    }

    /// HTTP-backed coordinator for `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config.timeout)?);
        let log = Arc::new(AuditLog::with_capacity(config.log_capacity));
        let store = StoreClient::new(
            transport,
            config.base_url.clone(),
            config.token.clone(),
            config.app_id.clone(),
            log,
        );
        Ok(Self::new(store).with_fetch_delay(config.fetch_delay))
    }

    /// Override the wait between submit and fetch.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Ask the service one question.
    ///
    /// The object name is registered before anything is sent, so a failed
    /// submit still leaves it in the registry for [`delete_all`](Self::delete_all).
    /// Concurrent calls are independent: each gets its own object.
    pub async fn research(&self, question: &str) -> Result<Answer> {
        if question.trim().is_empty() {
            return Err(Error::Validation("Please enter a question".to_string()));
        }

        let name = self.names.next();
        self.registry.register(&name);
        let goal = build_goal(question);

        info!("submitting {name}");
        self.store.submit(&name, &goal).await?;

        // No completion signal from the service; give it a fixed head start.
        debug!("waiting {:?} before fetching {name}", self.fetch_delay);
        tokio::time::sleep(self.fetch_delay).await;

        info!("fetching {name}");
        let raw = self
            .store
            .fetch(&name)
            .await
            .map_err(|e| Error::Retrieval(Box::new(e)))?;
        let text = raw
            .get("text_value")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or(NO_RESULTS)
            .to_string();

        let answer = Answer { text, raw };
        *self.last.lock().unwrap() = Some(answer.clone());
        Ok(answer)
    }

    /// Delete every registered object, concurrently and best-effort.
    ///
    /// Failures never abort the batch. Once every attempt has finished the
    /// batch is dropped from the registry and the last answer is cleared.
    pub async fn delete_all(&self) -> Vec<DeleteOutcome> {
        let batch = self.registry.names();
        if !batch.is_empty() {
            info!("deleting {} object(s)", batch.len());
        }

        let outcomes = join_all(batch.iter().map(|name| self.store.delete(name))).await;

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        if failed > 0 {
            warn!("{failed} of {} delete(s) failed", outcomes.len());
        }

        self.registry.remove_all(&batch);
        *self.last.lock().unwrap() = None;
        outcomes
    }

    /// Most recent successful answer, until the next `delete_all`.
    pub fn last_answer(&self) -> Option<Answer> {
        self.last.lock().unwrap().clone()
    }

    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }

    pub fn registered_names(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn audit_log(&self) -> &Arc<AuditLog> {
        self.store.audit_log()
    }
}
