//! Glue between user intents and the coordinator.
//!
//! Owns the coordinator and the UI projection for one interactive session.
//! Every intent (ask, toggle raw, delete all) goes through here so the
//! projection stays in step with what the coordinator returned.

use std::sync::Mutex;

use crate::coordinator::{Answer, Coordinator};
use crate::error::Error;
use crate::store::DeleteOutcome;
use crate::ui::UiState;

pub struct Session {
    coordinator: Coordinator,
    ui: Mutex<UiState>,
}

impl Session {
    pub fn new(coordinator: Coordinator) -> Self {
        Self {
            coordinator,
            ui: Mutex::new(UiState::new()),
        }
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Copy of the current projection.
    pub fn ui(&self) -> UiState {
        self.ui.lock().unwrap().clone()
    }

    pub async fn ask(&self, question: &str) -> Result<Answer, Error> {
        self.ui.lock().unwrap().start();
        let result = self.coordinator.research(question).await;
        self.ui.lock().unwrap().apply_result(&result);
        result
    }

    pub fn toggle_raw(&self) -> bool {
        self.ui.lock().unwrap().toggle_raw()
    }

    pub async fn delete_all(&self) -> Vec<DeleteOutcome> {
        let outcomes = self.coordinator.delete_all().await;
        self.ui.lock().unwrap().clear_after_delete();
        outcomes
    }
}
