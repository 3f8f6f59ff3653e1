//! Observable events emitted by formcapture
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in formcapture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration file decoded
    ConfigLoaded,
    /// Schema compiled
    SchemaLoaded,
    /// Non-fatal schema problem (e.g. unknown validation kind)
    SchemaWarning,
    /// Record store opened
    StoreOpened,
    /// HTTP listener bound
    ServerListening,
    /// Startup failed
    BootFailed,

    // Capture
    /// Submission validated and persisted
    CaptureAccepted,
    /// Submission failed field validation
    CaptureRejected,
    /// Submission valid but the store write failed
    CaptureStoreFailed,
    /// Form body present but unreadable
    CaptureBodyRejected,

    // Export
    /// CSV export produced
    ExportServed,
    /// CSV export failed
    ExportFailed,
    /// CSV export refused for bad credentials
    ExportUnauthorized,
    /// Stored value could not be decoded and was skipped
    RecordDecodeSkipped,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "FORMCAPTURE_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemaWarning => "SCHEMA_WARNING",
            Event::StoreOpened => "STORE_OPENED",
            Event::ServerListening => "FORMCAPTURE_SERVING",
            Event::BootFailed => "FORMCAPTURE_STARTUP_FAILED",

            Event::CaptureAccepted => "CAPTURE_ACCEPTED",
            Event::CaptureRejected => "CAPTURE_REJECTED",
            Event::CaptureStoreFailed => "CAPTURE_STORE_FAILED",
            Event::CaptureBodyRejected => "CAPTURE_BODY_REJECTED",

            Event::ExportServed => "EXPORT_SERVED",
            Event::ExportFailed => "EXPORT_FAILED",
            Event::ExportUnauthorized => "EXPORT_UNAUTHORIZED",
            Event::RecordDecodeSkipped => "RECORD_DECODE_SKIPPED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BootFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
