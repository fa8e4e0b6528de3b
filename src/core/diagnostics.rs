/// Diagnostics — reporting channel for non-fatal dispatch anomalies.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::core::effects::HandlerError;

/// A non-fatal problem observed while applying a batch of actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No handler is registered for the record's type.
    UnknownActionType { index: usize, action_type: String },
    /// The handler ran and reported a failure.
    HandlerFailed {
        index: usize,
        action_type: String,
        error: HandlerError,
    },
}

impl Diagnostic {
    /// Position of the offending record in its batch.
    pub fn index(&self) -> usize {
        match self {
            Self::UnknownActionType { index, .. } | Self::HandlerFailed { index, .. } => *index,
        }
    }

    pub fn action_type(&self) -> &str {
        match self {
            Self::UnknownActionType { action_type, .. }
            | Self::HandlerFailed { action_type, .. } => action_type,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownActionType { index, action_type } => {
                write!(f, "unknown action type '{}' at #{}", action_type, index)
            }
            Self::HandlerFailed {
                index,
                action_type,
                error,
            } => write!(f, "action '{}' at #{} failed: {}", action_type, index, error),
        }
    }
}

/// Receives diagnostics as they happen.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: &Diagnostic);
}

/// Default sink: every diagnostic becomes a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::UnknownActionType { index, action_type } => {
                tracing::warn!(%action_type, index, "Unknown action type");
            }
            Diagnostic::HandlerFailed {
                index,
                action_type,
                error,
            } => {
                tracing::warn!(%action_type, index, %error, "Action handler failed");
            }
        }
    }
}

/// Collects diagnostics in memory. Clones share the same buffer, so a clone
/// can be handed to a dispatcher and read back afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<Diagnostic>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }
}
