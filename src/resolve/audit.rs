//! Resolution audit hooks.
//!
//! Records capture a stage plus structured details so callers can trace the
//! substitution chain of a pass without touching the resolver itself.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

/// Checkpoints emitted by [`Resolver`](super::Resolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveAuditStage {
    PassStarted,
    NodeVisited,
    /// A child was replaced by the substitute it reported.
    SubstituteApplied,
    /// A child was not queried because it, or its owner, is final.
    FinalSkipped,
    PassCompleted,
    PassFailed,
}

#[derive(Debug, Clone)]
pub struct ResolveAuditEvent {
    pub timestamp: SystemTime,
    pub stage: ResolveAuditStage,
    pub details: Vec<(String, Value)>,
}

impl ResolveAuditEvent {
    fn new(stage: ResolveAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

pub struct ResolveAuditEventBuilder {
    event: ResolveAuditEvent,
}

impl ResolveAuditEventBuilder {
    pub fn new(stage: ResolveAuditStage) -> Self {
        Self {
            event: ResolveAuditEvent::new(stage),
        }
    }

    pub fn detail(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> ResolveAuditEvent {
        self.event
    }
}

pub trait ResolveAudit: Send + Sync {
    fn record(&self, event: ResolveAuditEvent);
}

#[derive(Debug, Default)]
pub struct NullResolveAudit;

impl ResolveAudit for NullResolveAudit {
    fn record(&self, _event: ResolveAuditEvent) {}
}

/// Buffers every event in memory.
#[derive(Debug, Default)]
pub struct RecordingAudit {
    events: Mutex<Vec<ResolveAuditEvent>>,
}

impl RecordingAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ResolveAuditEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<ResolveAuditStage> {
        self.events().into_iter().map(|event| event.stage).collect()
    }
}

impl ResolveAudit for RecordingAudit {
    fn record(&self, event: ResolveAuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
