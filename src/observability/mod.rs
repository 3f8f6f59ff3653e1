//! Observability for formcapture
//!
//! Structured JSON-lines logging and typed lifecycle events.
//!
//! ```ignore
//! use formcapture::observability::{log_event_with_fields, Event, Logger, Severity};
//!
//! Logger::log(Severity::Info, "CUSTOM_EVENT", &[("key", "value")]);
//! log_event_with_fields(Event::StoreOpened, &[("path", "config/captured_data.db")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event at its default severity
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(default_severity(event), event.as_str(), fields);
}

fn default_severity(event: Event) -> Severity {
    match event {
        Event::BootFailed => Severity::Fatal,
        Event::CaptureStoreFailed | Event::ExportFailed => Severity::Error,
        Event::SchemaWarning
        | Event::CaptureBodyRejected
        | Event::ExportUnauthorized
        | Event::RecordDecodeSkipped => Severity::Warn,
        _ => Severity::Info,
    }
}
