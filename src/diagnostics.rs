//! Diagnostic sink handed to each pipeline stage.
//!
//! Stages never log through ambient state; they receive a `&dyn Diagnostics`
//! that the binary builds once at startup. The default sink forwards to
//! `tracing`, whose subscriber writes to stderr, so diagnostics never mix
//! with the output artifacts.

use crate::error::Stage;
use std::cell::RefCell;
use tracing::Level;

pub trait Diagnostics {
    fn emit(&self, level: Level, stage: Stage, message: &str);

    fn info(&self, stage: Stage, message: &str) {
        self.emit(Level::INFO, stage, message);
    }

    fn debug(&self, stage: Stage, message: &str) {
        self.emit(Level::DEBUG, stage, message);
    }

    fn warn(&self, stage: Stage, message: &str) {
        self.emit(Level::WARN, stage, message);
    }
}

/// Forwards every message to the installed `tracing` subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, level: Level, stage: Stage, message: &str) {
        let stage = stage.to_string();
        match level {
            Level::ERROR => tracing::error!(stage = %stage, "{}", message),
            Level::WARN => tracing::warn!(stage = %stage, "{}", message),
            Level::INFO => tracing::info!(stage = %stage, "{}", message),
            Level::DEBUG => tracing::debug!(stage = %stage, "{}", message),
            _ => tracing::trace!(stage = %stage, "{}", message),
        }
    }
}

/// A single captured diagnostic
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub level: Level,
    pub stage: Stage,
    pub message: String,
}

/// Keeps every message in memory, for callers that want to inspect them
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    records: RefCell<Vec<Record>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.borrow().clone()
    }

    pub fn messages_for(&self, stage: Stage) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.stage == stage)
            .map(|r| r.message.clone())
            .collect()
    }

    pub fn has_level(&self, level: Level) -> bool {
        self.records.borrow().iter().any(|r| r.level == level)
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn emit(&self, level: Level, stage: Stage, message: &str) {
        self.records.borrow_mut().push(Record {
            level,
            stage,
            message: message.to_string(),
        });
    }
}
