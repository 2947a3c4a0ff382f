// crates/descheduler-policy-cli/src/audit.rs
// ============================================================================
// Module: CLI Audit Logging
// Description: Structured audit events for registry setup and conversions.
// Purpose: Emit JSON-line events without coupling to a logging pipeline.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The conversion layer itself never logs; the CLI records what it did
//! through an [`AuditSink`]. Events are single-line JSON objects so they can
//! be routed to any collector.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::config::AuditConfig;
use crate::config::AuditSinkKind;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Emitted once the conversion and args registries are built.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryInitializedEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Registered conversion pairs.
    pub conversions: usize,
    /// Registered args kinds.
    pub args_kinds: usize,
    /// Plugin name bindings.
    pub plugin_bindings: usize,
}

impl RegistryInitializedEvent {
    /// Builds the event stamped with the current time.
    #[must_use]
    pub fn new(conversions: usize, args_kinds: usize, plugin_bindings: usize) -> Self {
        Self {
            event: "registry_initialized",
            timestamp_ms: now_ms(),
            conversions,
            args_kinds,
            plugin_bindings,
        }
    }
}

/// Result of one document command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// The document loaded and converted.
    Success,
    /// Loading or conversion failed.
    Failure,
}

/// Emitted after a document command finishes.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentConvertedEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Command that processed the document.
    pub command: &'static str,
    /// Input path as given.
    pub input: String,
    /// Outcome.
    pub outcome: ConversionOutcome,
    /// Profile count on success.
    pub profiles: Option<usize>,
    /// Error message on failure.
    pub error: Option<String>,
}

impl DocumentConvertedEvent {
    /// Builds a success event.
    #[must_use]
    pub fn success(command: &'static str, input: &Path, profiles: usize) -> Self {
        Self {
            event: "document_converted",
            timestamp_ms: now_ms(),
            command,
            input: input.display().to_string(),
            outcome: ConversionOutcome::Success,
            profiles: Some(profiles),
            error: None,
        }
    }

    /// Builds a failure event.
    #[must_use]
    pub fn failure(command: &'static str, input: &Path, error: String) -> Self {
        Self {
            event: "document_converted",
            timestamp_ms: now_ms(),
            command,
            input: input.display().to_string(),
            outcome: ConversionOutcome::Failure,
            profiles: None,
            error: Some(error),
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for CLI events.
pub trait AuditSink: Send + Sync {
    /// Record a registry initialization event.
    fn record_registry(&self, event: &RegistryInitializedEvent);

    /// Record a document conversion event.
    fn record_document(&self, event: &DocumentConvertedEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_registry(&self, event: &RegistryInitializedEvent) {
        write_json_line(&mut io::stderr(), event);
    }

    fn record_document(&self, event: &DocumentConvertedEvent) {
        write_json_line(&mut io::stderr(), event);
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one event under the file lock.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(mut file) = self.file.lock() {
            write_json_line(&mut *file, event);
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_registry(&self, event: &RegistryInitializedEvent) {
        self.append(event);
    }

    fn record_document(&self, event: &DocumentConvertedEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_registry(&self, _event: &RegistryInitializedEvent) {}

    fn record_document(&self, _event: &DocumentConvertedEvent) {}
}

/// Builds the sink selected by configuration.
///
/// # Errors
///
/// Returns an error when the file sink cannot open its log file.
pub fn build_audit_sink(config: &AuditConfig) -> io::Result<Box<dyn AuditSink>> {
    match (config.sink, config.path.as_deref()) {
        (AuditSinkKind::Stderr, _) => Ok(Box::new(StderrAuditSink)),
        (AuditSinkKind::File, Some(path)) => Ok(Box::new(FileAuditSink::new(Path::new(path))?)),
        (AuditSinkKind::File, None) => {
            Err(io::Error::new(io::ErrorKind::InvalidInput, "audit.path is required"))
        }
        (AuditSinkKind::None, _) => Ok(Box::new(NoopAuditSink)),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serializes an event and writes it as one line; write failures are dropped.
fn write_json_line<W: Write, T: Serialize>(writer: &mut W, event: &T) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(writer, "{payload}");
    }
}

/// Milliseconds since the Unix epoch, zero if the clock is before it.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |duration| duration.as_millis())
}
