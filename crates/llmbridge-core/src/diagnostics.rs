//! Non-fatal diagnostics.
//!
//! Some paths recover locally instead of failing the call (unknown model
//! names, structured output that is not valid JSON). They report through a
//! [`DiagnosticSink`] so callers and tests can observe them without scraping
//! log output.

use std::fmt;
use std::sync::Mutex;

use tracing::warn;

use crate::types::Provider;

/// A recovered condition worth reporting.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// No provider marker matched the model name.
    ProviderFallback { model: String, fallback: Provider },
    /// A schema was requested but the content did not parse as JSON.
    StructuredOutputParse {
        provider: Provider,
        model: String,
        error: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ProviderFallback { model, fallback } => write!(
                f,
                "could not detect provider for model '{model}', defaulting to {fallback}"
            ),
            Diagnostic::StructuredOutputParse {
                provider,
                model,
                error,
            } => write!(
                f,
                "failed to parse structured output from {provider} ({model}): {error}"
            ),
        }
    }
}

/// Receiver for [`Diagnostic`]s.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Default sink: forwards to `tracing::warn!`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
    }
}

/// Collects diagnostics in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match self.events.lock() {
            Ok(mut events) => events.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
