use derive_more::Display;

/// Log levels with automatic Display implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum LogLevel {
    #[display(fmt = "DEBUG")]
    Debug = 0,
    #[display(fmt = " INFO")]
    Info = 1,
    #[display(fmt = " WARN")]
    Warn = 2,
    #[display(fmt = "ERROR")]
    Error = 3,
}

/// Log components with automatic Display implementation
#[derive(Debug, Clone, Display)]
pub enum LogComponent {
    #[display(fmt = "DOM:{}", _0)]
    Domain(&'static str),
    #[display(fmt = "APP:{}", _0)]
    Application(&'static str),
    #[display(fmt = "INF:{}", _0)]
    Infrastructure(&'static str),
    #[display(fmt = "PRE:{}", _0)]
    Presentation(&'static str),
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: u64,
    pub level: LogLevel,
    pub component: LogComponent,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, component: LogComponent, message: &str) -> Self {
        Self {
            timestamp: get_time_provider().current_timestamp(),
            level,
            component,
            message: message.to_string(),
        }
    }

    /// `[HH:MM:SS.mmm] LEVEL COMP:name: message`
    pub fn format(&self) -> String {
        format!(
            "[{}] {} {}: {}",
            get_time_provider().format_timestamp(self.timestamp),
            self.level,
            self.component,
            self.message
        )
    }
}

pub trait TimeProvider: Send + Sync {
    fn current_timestamp(&self) -> u64;
    fn format_timestamp(&self, timestamp: u64) -> String;
}

pub trait Logger: Send + Sync {
    fn log(&self, entry: LogEntry);

    fn debug(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Debug, component, message));
    }

    fn info(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Info, component, message));
    }

    fn warn(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Warn, component, message));
    }

    fn error(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Error, component, message));
    }
}

use std::sync::OnceLock;
static GLOBAL_LOGGER: OnceLock<Box<dyn Logger + Sync + Send>> = OnceLock::new();
static GLOBAL_TIME_PROVIDER: OnceLock<Box<dyn TimeProvider + Sync + Send>> = OnceLock::new();

/// Install the process-wide logger. Later calls are ignored.
pub fn init_logger(logger: Box<dyn Logger + Sync + Send>) {
    let _ = GLOBAL_LOGGER.set(logger);
}

pub fn init_time_provider(time_provider: Box<dyn TimeProvider + Sync + Send>) {
    let _ = GLOBAL_TIME_PROVIDER.set(time_provider);
}

pub fn get_logger() -> &'static dyn Logger {
    GLOBAL_LOGGER.get().map(|logger| logger.as_ref()).unwrap_or(&NoOpLogger)
}

pub fn get_time_provider() -> &'static dyn TimeProvider {
    GLOBAL_TIME_PROVIDER.get().map(|provider| provider.as_ref()).unwrap_or(&BasicTimeProvider)
}

struct NoOpLogger;
impl Logger for NoOpLogger {
    fn log(&self, _entry: LogEntry) {}
}

/// Fallback for native tests where no browser clock exists.
struct BasicTimeProvider;
impl TimeProvider for BasicTimeProvider {
    fn current_timestamp(&self) -> u64 {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        COUNTER.fetch_add(1, Ordering::SeqCst)
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        format!("{:06}", timestamp)
    }
}

#[macro_export]
macro_rules! log_debug {
    ($component:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            $crate::domain::logging::Logger::debug(
                $crate::domain::logging::get_logger(),
                $component,
                &format!($($arg)*),
            );
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($component:expr, $($arg:tt)*) => {
        $crate::domain::logging::Logger::info(
            $crate::domain::logging::get_logger(),
            $component,
            &format!($($arg)*),
        );
    };
}

#[macro_export]
macro_rules! log_warn {
    ($component:expr, $($arg:tt)*) => {
        $crate::domain::logging::Logger::warn(
            $crate::domain::logging::get_logger(),
            $component,
            &format!($($arg)*),
        );
    };
}

#[macro_export]
macro_rules! log_error {
    ($component:expr, $($arg:tt)*) => {
        $crate::domain::logging::Logger::error(
            $crate::domain::logging::get_logger(),
            $component,
            &format!($($arg)*),
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_render_with_layer_prefix() {
        assert_eq!(LogComponent::Application("Controller").to_string(), "APP:Controller");
        assert_eq!(LogComponent::Infrastructure("HTTP").to_string(), "INF:HTTP");
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Error > LogLevel::Warn);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert_eq!(LogLevel::Info.to_string(), " INFO");
    }

    #[test]
    fn debug_is_the_most_verbose_level() {
        let levels = [LogLevel::Error, LogLevel::Warn, LogLevel::Info, LogLevel::Debug];
        assert_eq!(levels.iter().min(), Some(&LogLevel::Debug));
        assert_eq!(LogLevel::Debug as u8, 0);
    }

    #[test]
    fn entry_format_contains_component_and_message() {
        let entry = LogEntry::new(LogLevel::Warn, LogComponent::Domain("Alerts"), "empty value");
        let line = entry.format();
        assert!(line.contains("WARN DOM:Alerts: empty value"));
    }
}
