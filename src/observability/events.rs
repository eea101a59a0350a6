//! Observable events
//!
//! Every line the service logs names one of these events.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Process startup begins
    BootStart,
    /// Configuration resolved and validated
    ConfigLoaded,
    /// Storage backend opened and schema bootstrapped
    StoreOpened,
    /// Record cache connected
    CacheOpened,
    /// HTTP listener bound
    ServerListening,
    /// Shutdown signal received
    ShutdownStart,
    /// Resources released
    ShutdownComplete,
    /// Startup could not complete
    BootFailed,

    // Request path
    /// Person persisted and cached
    PersonCreated,
    /// Point lookup missed the cache and went to storage
    CacheMiss,
    /// Cache could not be refilled after a storage read
    CacheRepopulateFailed,
    /// Request ended in a server-side failure
    RequestFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "PESSOAS_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::CacheOpened => "CACHE_OPENED",
            Event::ServerListening => "SERVER_LISTENING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::BootFailed => "STARTUP_FAILED",
            Event::PersonCreated => "PERSON_CREATED",
            Event::CacheMiss => "CACHE_MISS",
            Event::CacheRepopulateFailed => "CACHE_REPOPULATE_FAILED",
            Event::RequestFailed => "REQUEST_FAILED",
        }
    }

    /// Returns true if this event indicates the process cannot continue
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BootFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
