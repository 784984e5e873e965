//! FILENAME: grid-engine/src/logging.rs
// PURPOSE: Category-tagged logging on top of the `log` facade.
// The engine never installs a logger; the host application chooses one.

use std::fmt;

pub use log::Level;

/// Target used for every engine log record.
pub const LOG_TARGET: &str = "grid_engine";

/// Write a log line in unified `category|message` format.
pub fn write_log(level: Level, category: &str, args: fmt::Arguments<'_>) {
    log::log!(target: LOG_TARGET, level, "{}|{}", category, args);
}

#[macro_export]
macro_rules! log_trace {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Trace, $cat, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Debug, $cat, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Info, $cat, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Warn, $cat, format_args!($($arg)*))
    };
}
