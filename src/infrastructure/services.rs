use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};
use crate::time_utils::format_clock_time;

/// Writes log entries through the page console so they pass through the
/// same capture hooks as the application's own output.
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn new_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    pub fn new_production() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        let line = entry.render();
        match entry.level {
            LogLevel::Error => gloo::console::error!(line),
            LogLevel::Warn => gloo::console::warn!(line),
            LogLevel::Debug | LogLevel::Trace => gloo::console::debug!(line),
            LogLevel::Info => gloo::console::log!(line),
        }
    }
}

/// Log timestamps from `Date.now()`. Reads the saved real clock once fake
/// time is installed, see `browser::clock`.
pub struct BrowserTimeProvider;

impl BrowserTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BrowserTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for BrowserTimeProvider {
    fn current_timestamp(&self) -> u64 {
        super::browser::clock::real_date_now() as u64
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        format_clock_time(timestamp)
    }
}
