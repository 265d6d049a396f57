//! Shared alert channel.
//!
//! Components push user-facing messages here instead of failing; the rendering layer drains
//! them in order.

use std::sync::{Arc, Mutex};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
}

/// Ordered list of pending alerts. Clones share the list.
#[derive(Clone, Debug, Default)]
pub struct AlertService {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

impl AlertService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Severity::Error, message.into());
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(Severity::Warning, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(Severity::Info, message.into());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Severity::Success, message.into());
    }

    /// Snapshot of the pending alerts, oldest first.
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts
            .lock()
            .map(|alerts| alerts.clone())
            .unwrap_or_default()
    }

    /// Removes and returns the pending alerts, oldest first.
    pub fn drain(&self) -> Vec<Alert> {
        self.alerts
            .lock()
            .map(|mut alerts| std::mem::take(&mut *alerts))
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.alerts.lock().map(|alerts| alerts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, severity: Severity, message: String) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(Alert { severity, message });
        }
    }
}
