#![deny(missing_docs)]
//! Logging for the score scraper workspace.
//!
//! Every crate logs through the `scrape_*` macros. While the orchestrator works
//! on a calendar day, messages from that thread carry a `[YYYY-MM-DD] ` prefix,
//! so an interleaved log file can still be grepped per day.

#[doc(hidden)]
pub use log;

use std::cell::RefCell;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

thread_local! {
    static CURRENT_DAY: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Tags messages from this thread with `day` until [`clear_current_day`].
pub fn set_current_day(day: impl Into<String>) {
    CURRENT_DAY.with(|slot| *slot.borrow_mut() = Some(day.into()));
}

/// Removes the day tag for this thread.
pub fn clear_current_day() {
    CURRENT_DAY.with(|slot| slot.borrow_mut().take());
}

/// `"[YYYY-MM-DD] "` while a day is set, otherwise empty.
pub fn day_prefix() -> String {
    CURRENT_DAY.with(|slot| {
        slot.borrow()
            .as_deref()
            .map(|day| format!("[{day}] "))
            .unwrap_or_default()
    })
}

#[doc(hidden)]
#[macro_export]
macro_rules! __scrape_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::log::log!(
            $crate::log::Level::$level,
            "{}{}",
            $crate::day_prefix(),
            format_args!($($arg)*)
        )
    };
}

/// Trace-level message, prefixed with the current day.
#[macro_export]
macro_rules! scrape_trace {
    ($($arg:tt)*) => { $crate::__scrape_log!(Trace, $($arg)*) };
}

/// Debug-level message, prefixed with the current day.
#[macro_export]
macro_rules! scrape_debug {
    ($($arg:tt)*) => { $crate::__scrape_log!(Debug, $($arg)*) };
}

/// Info-level message, prefixed with the current day.
#[macro_export]
macro_rules! scrape_info {
    ($($arg:tt)*) => { $crate::__scrape_log!(Info, $($arg)*) };
}

/// Warn-level message, prefixed with the current day.
#[macro_export]
macro_rules! scrape_warn {
    ($($arg:tt)*) => { $crate::__scrape_log!(Warn, $($arg)*) };
}

/// Error-level message, prefixed with the current day.
#[macro_export]
macro_rules! scrape_error {
    ($($arg:tt)*) => { $crate::__scrape_log!(Error, $($arg)*) };
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// The log file only.
    File,
    /// The terminal only.
    Terminal,
    /// Terminal and log file.
    Both,
}

impl LogDestination {
    fn to_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }

    fn to_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }
}

/// Installs the process logger.
///
/// The file at `log_path` is appended to, so nightly runs accumulate in one
/// place. A file that cannot be opened is reported on stderr and skipped.
pub fn initialize(destination: LogDestination, level: LevelFilter, log_path: &Path) {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if destination.to_terminal() {
        loggers.push(terminal_logger(level, config.clone()));
    }
    if destination.to_file() {
        match open_append(log_path) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!("Warning: could not open log file {:?}: {}", log_path, err),
        }
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

/// Terminal logger for tests. A second call is a no-op.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = CombinedLogger::init(vec![terminal_logger(level, Config::default())]);
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<TermLogger> {
    TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn open_append(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
