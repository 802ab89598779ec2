use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};

/// Writes log lines to the browser console, dropping anything below `min_level`.
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

    pub fn accepts(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if !self.accepts(entry.level) {
            return;
        }
        let line = entry.format();
        match entry.level {
            LogLevel::Error => web_sys::console::error_1(&line.into()),
            LogLevel::Warn => web_sys::console::warn_1(&line.into()),
            LogLevel::Info => web_sys::console::info_1(&line.into()),
            LogLevel::Debug => web_sys::console::debug_1(&line.into()),
        }
    }
}

/// Wall clock from `Date.now()`.
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
        js_sys::Date::now() as u64
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        crate::time_utils::format_clock_millis(timestamp)
    }
}
