//! Client for the research service's named-object API.
//!
//! Three operations: create-and-submit, fetch-by-name, delete-by-name.
//! [`StoreClient`] builds the requests, attaches auth headers, records every
//! call in the [`AuditLog`] and classifies the outcome. The wire is behind
//! the [`Transport`] trait so the client can be driven by a script in tests.

pub mod http;
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Serialize;
use serde_json::{Value, json};

use crate::audit::{AuditLog, Method};
use crate::consts::{APP_ID_HEADER, DELETE_PATH, FETCH_PATH, GENERIC_REJECTION, SUBMIT_PATH};
use crate::error::{Error, Result};

/// A fully-built request, ready for the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl StoreRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Any HTTP answer, success or not. Empty or non-JSON bodies are `Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreResponse {
    pub status: u16,
    pub body: Value,
}

impl StoreResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves a request to the service and back.
///
/// Implementations return `Err(Error::Transport)` only when no HTTP
/// response was obtained. Every status code is a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &StoreRequest) -> Result<StoreResponse>;
}

/// Body of the create-and-submit call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitBody<'a> {
    pub created_object_name: &'a str,
    pub goal: &'a str,
}

/// Per-name result of a best-effort delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub name: String,
    pub result: std::result::Result<(), String>,
}

impl DeleteOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Authenticated client for one base endpoint.
pub struct StoreClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    token: String,
    app_id: String,
    log: Arc<AuditLog>,
}

impl StoreClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        token: impl Into<String>,
        app_id: impl Into<String>,
        log: Arc<AuditLog>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            app_id: app_id.into(),
            log,
        }
    }

    pub fn audit_log(&self) -> &Arc<AuditLog> {
        &self.log
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create `name` on the service with the given goal.
    pub async fn submit(&self, name: &str, goal: &str) -> Result<Value> {
        let body = serde_json::to_value(SubmitBody {
            created_object_name: name,
            goal,
        })
        .map_err(|e| Error::Transport(format!("failed to encode request: {e}")))?;

        let response = self
            .call(Method::Post, SUBMIT_PATH.to_string(), Some(body))
            .await?;
        classify(response)
    }

    /// Current value of `name`. A still-pending object comes back as a
    /// success without `text_value`; interpreting that is up to the caller.
    pub async fn fetch(&self, name: &str) -> Result<Value> {
        let response = self
            .call(Method::Get, format!("{FETCH_PATH}/{name}"), None)
            .await?;
        classify(response)
    }

    /// Remove `name`. Never fails: rejections and transport errors are
    /// logged and returned in the outcome.
    pub async fn delete(&self, name: &str) -> DeleteOutcome {
        let result = match self
            .call(Method::Delete, format!("{DELETE_PATH}/{name}"), None)
            .await
            .and_then(classify)
        {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("failed to delete {name}: {e}");
                Err(e.to_string())
            }
        };
        DeleteOutcome {
            name: name.to_string(),
            result,
        }
    }

    /// Send one request and record it, whatever happens.
    async fn call(&self, method: Method, path: String, body: Option<Value>) -> Result<StoreResponse> {
        let mut headers = vec![
            ("authorization".to_string(), format!("Bearer {}", self.token)),
            (APP_ID_HEADER.to_string(), self.app_id.clone()),
        ];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }

        let request = StoreRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers,
            body,
        };

        debug!("{method} {path}");
        let outcome = self.transport.send(&request).await;

        let logged = match &outcome {
            Ok(response) => response.body.clone(),
            Err(e) => json!({ "error": e.to_string() }),
        };
        self.log.record(method, path, request.body, logged);

        outcome
    }
}

fn classify(response: StoreResponse) -> Result<Value> {
    if response.is_success() {
        return Ok(response.body);
    }
    let message = response
        .body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(GENERIC_REJECTION)
        .to_string();
    Err(Error::RemoteRejected(message))
}
