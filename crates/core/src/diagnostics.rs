//! Injected diagnostic capability.
//!
//! The coordinator reports what it did through a [`DiagnosticSink`] but
//! never consults it, so a sink can drop, buffer or forward events without
//! affecting join outcomes.

/// A structured event sink.
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, event: &str, fields: &[(&str, String)]);
}

/// Forwards events to `tracing` at INFO level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, event: &str, fields: &[(&str, String)]) {
        let fields = fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(target: "cohort::diagnostics", event, %fields, "Scope event");
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn log(&self, _event: &str, _fields: &[(&str, String)]) {}
}
