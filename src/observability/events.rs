//! Observability events for persondb
//!
//! Every lifecycle and persistence log line carries one of these as its
//! `event` field so logs can be filtered without parsing messages.

use std::fmt;

/// Observable events in persondb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// Server bound and accepting requests
    Serving,
    /// Shutdown signal received
    ShutdownStart,

    // Durable log
    /// Log file absent, treated as empty
    LogMissing,
    /// Log reloaded into memory
    LogLoaded,
    /// Log created with header only
    LogCreated,
    /// A data row could not be interpreted
    RowSkipped,
    /// A log read or write failed
    PersistFailed,

    // Person operations
    /// Person created and appended
    PersonCreated,
    /// Person renamed and log rewritten
    PersonUpdated,
    /// Person removed and log rewritten
    PersonDeleted,
    /// Name failed validation
    NameRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "PERSONDB_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "PERSONDB_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",

            Event::LogMissing => "LOG_MISSING",
            Event::LogLoaded => "LOG_LOADED",
            Event::LogCreated => "LOG_CREATED",
            Event::RowSkipped => "LOG_ROW_SKIPPED",
            Event::PersistFailed => "PERSIST_FAILED",

            Event::PersonCreated => "PERSON_CREATED",
            Event::PersonUpdated => "PERSON_UPDATED",
            Event::PersonDeleted => "PERSON_DELETED",
            Event::NameRejected => "NAME_REJECTED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
