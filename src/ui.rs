//! What the REPL shows: the latest answer or error, the raw payload toggle,
//! and text renderings of the audit log and delete outcomes.
//!
//! Nothing here is authoritative; [`UiState`] is a projection of the last
//! outcome the coordinator handed back.

use serde_json::Value;

use crate::audit::CallLogEntry;
use crate::coordinator::Answer;
use crate::error::Error;
use crate::store::DeleteOutcome;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub answer: Option<String>,
    pub error: Option<String>,
    pub loading: bool,
    pub raw: Option<Value>,
    pub show_raw: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A question went out; forget the previous outcome.
    pub fn start(&mut self) {
        self.loading = true;
        self.answer = None;
        self.error = None;
        self.raw = None;
    }

    pub fn apply_result(&mut self, result: &Result<Answer, Error>) {
        self.loading = false;
        match result {
            Ok(answer) => {
                self.answer = Some(answer.text.clone());
                self.raw = Some(answer.raw.clone());
                self.error = None;
            }
            Err(e) => {
                self.answer = None;
                self.raw = None;
                self.error = Some(match e {
                    Error::Validation(msg) => msg.clone(),
                    Error::Retrieval(inner) => format!("Error retrieving results: {inner}"),
                    other => format!("Research failed: {other}"),
                });
            }
        }
    }

    /// Flip the raw view. Returns the new setting; stays off without a payload.
    pub fn toggle_raw(&mut self) -> bool {
        self.show_raw = self.raw.is_some() && !self.show_raw;
        self.show_raw
    }

    pub fn clear_after_delete(&mut self) {
        self.answer = None;
        self.raw = None;
        self.show_raw = false;
    }

    /// Answer or error, plus the raw payload when toggled on.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(error) = &self.error {
            out.push_str(&format!("error: {error}\n"));
        }
        if let Some(answer) = &self.answer {
            out.push_str(&format!("\n=> {answer}\n"));
        }
        if self.show_raw
            && let Some(raw) = &self.raw
        {
            out.push_str("\nraw:\n");
            out.push_str(&pretty(raw));
            out.push('\n');
        }
        out
    }
}

/// Pretty JSON, falling back to the compact form.
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Audit log entries, newest first, as shown by `/log`.
pub fn render_log(entries: &[CallLogEntry]) -> String {
    if entries.is_empty() {
        return "  no calls yet\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "  [{}] {} {}\n",
            entry.timestamp.format("%H:%M:%S%.3f"),
            entry.method,
            entry.url
        ));
        if let Some(body) = &entry.request_body {
            out.push_str(&indent("request: ", &pretty(body)));
        }
        out.push_str(&indent("response: ", &pretty(&entry.response_body)));
    }
    out
}

pub fn render_deletes(outcomes: &[DeleteOutcome]) -> String {
    if outcomes.is_empty() {
        return "  no objects to delete\n".to_string();
    }
    let mut out = String::new();
    for outcome in outcomes {
        match &outcome.result {
            Ok(()) => out.push_str(&format!("  ✓ {}\n", outcome.name)),
            Err(reason) => out.push_str(&format!("  ✗ {} ({reason})\n", outcome.name)),
        }
    }
    out
}

fn indent(label: &str, text: &str) -> String {
    let mut out = String::new();
    for (i, line) in text.lines().enumerate() {
        if i == 0 {
            out.push_str(&format!("    {label}{line}\n"));
        } else {
            out.push_str(&format!("    {line}\n"));
        }
    }
    out
}
