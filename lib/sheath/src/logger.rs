//! Structured log records and the loggers that receive them.
//!
//! Decorators never reach for a global logger: a [`Logger`] handle is passed
//! in at construction and every record carries the component name it was
//! configured with.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Severity of a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A dispatch or capture failed.
    Error,
    /// Request/response details.
    Debug,
}

/// Key of the single field a [`Record`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Target URL of the request.
    Url,
    /// Header-only dump of the request.
    RequestDump,
    /// Rendering of the request body.
    RequestBody,
    /// Header-only dump of the response.
    ResponseDump,
    /// Rendering of the response body.
    ResponseBody,
    /// A failure.
    Error,
}

impl Field {
    /// The key as written in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::RequestDump => "request_dump",
            Self::RequestBody => "request_body",
            Self::ResponseDump => "response_dump",
            Self::ResponseBody => "response_body",
            Self::Error => "err",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured key/value log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Severity.
    pub severity: Severity,
    /// Component that produced the record.
    pub component: String,
    /// Short message.
    pub message: &'static str,
    /// Field key.
    pub field: Field,
    /// Field value.
    pub value: String,
}

/// Receiver of structured log records.
pub trait Logger: Send + Sync + 'static {
    /// Handle one record.
    fn log(&self, record: &Record);
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn log(&self, record: &Record) {
        (**self).log(record);
    }
}

impl<L: Logger + ?Sized> Logger for Box<L> {
    fn log(&self, record: &Record) {
        (**self).log(record);
    }
}

/// Forwards records to `tracing` events.
///
/// Events carry `component`, `field` and `value` fields; the record message
/// becomes the event message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, record: &Record) {
        let Record {
            severity,
            component,
            message,
            field,
            value,
        } = record;

        match severity {
            Severity::Error => tracing::error!(
                component = %component,
                field = field.as_str(),
                value = %value,
                "{message}"
            ),
            Severity::Debug => tracing::debug!(
                component = %component,
                field = field.as_str(),
                value = %value,
                "{message}"
            ),
        }
    }
}

/// Keeps records in memory.
///
/// Clones share the same buffer, so one clone can be handed to a decorator
/// while another is used to inspect what was logged.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    records: Arc<Mutex<Vec<Record>>>,
}

impl MemoryLogger {
    /// Create an empty logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record logged so far.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Value of the first record with this field, if any.
    #[must_use]
    pub fn value_of(&self, field: Field) -> Option<String> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|record| record.field == field)
            .map(|record| record.value.clone())
    }

    /// Remove and return every record.
    pub fn drain(&self) -> Vec<Record> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, record: &Record) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(field: Field, value: &str) -> Record {
        Record {
            severity: Severity::Debug,
            component: "test".to_string(),
            message: "round trip",
            field,
            value: value.to_string(),
        }
    }

    #[test]
    fn field_keys() {
        assert_eq!(Field::Url.as_str(), "url");
        assert_eq!(Field::RequestDump.to_string(), "request_dump");
        assert_eq!(Field::ResponseBody.to_string(), "response_body");
        assert_eq!(Field::Error.as_str(), "err");
    }

    #[test]
    fn memory_logger_clones_share_records() {
        let logger = MemoryLogger::new();
        let handle: Arc<dyn Logger> = Arc::new(logger.clone());

        handle.log(&record(Field::Url, "http://localhost/"));
        handle.log(&record(Field::RequestBody, "<none>"));

        assert_eq!(logger.records().len(), 2);
        assert_eq!(logger.value_of(Field::RequestBody).as_deref(), Some("<none>"));
        assert_eq!(logger.value_of(Field::ResponseBody), None);

        let drained = logger.drain();
        assert_eq!(drained.len(), 2);
        assert!(logger.records().is_empty());
    }

    #[test]
    fn tracing_logger_accepts_both_severities() {
        let logger = TracingLogger;
        logger.log(&record(Field::Url, "http://localhost/"));
        logger.log(&Record {
            severity: Severity::Error,
            ..record(Field::Error, "connection error: refused")
        });
    }
}
