use log::{Record, Level, Metadata, LevelFilter, SetLoggerError};

pub const TARGET: &str = "nero";

#[macro_use]
pub mod macros {
    #[doc(alias = "log::error")]
    #[macro_export]
    macro_rules! log_error {
        ($($arg:tt)*) => {
            ::log::error!(target: $crate::logger::TARGET, $($arg)*)
        };
    }
    #[doc(alias = "log::warn")]
    #[macro_export]
    macro_rules! log_warn {
        ($($arg:tt)*) => {
            ::log::warn!(target: $crate::logger::TARGET, $($arg)*)
        };
    }
    #[doc(alias = "log::info")]
    #[macro_export]
    macro_rules! log_info {
        ($($arg:tt)*) => {
            ::log::info!(target: $crate::logger::TARGET, $($arg)*)
        };
    }
    #[doc(alias = "log::debug")]
    #[macro_export]
    macro_rules! log_debug {
        ($($arg:tt)*) => {
            ::log::debug!(target: $crate::logger::TARGET, $($arg)*)
        };
    }
}

struct SimpleLogger;

impl log::Log for SimpleLogger {
    #[inline]
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target() == TARGET && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        match record.level() {
            Level::Error | Level::Warn => eprintln!("[{}] {} {}", now, record.level(), record.args()),
            _ => println!("[{}] {} {}", now, record.level(), record.args()),
        }
    }
    #[inline]
    fn flush(&self) {}
}

static LOGGER: SimpleLogger = SimpleLogger;

/// Niveau par défaut : tout en debug, `info` en release.
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) { LevelFilter::Trace } else { LevelFilter::Info }
}

pub fn init(level: Option<LevelFilter>) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)
        .map(|_| log::set_max_level(level.unwrap_or_else(default_level)))
}
