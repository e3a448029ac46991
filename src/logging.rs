/// Buffered logging for the dust storm-event pipeline.
///
/// Console output happens immediately; every entry is also appended to an
/// in-memory transcript that the package writer saves as `log.txt` once the
/// run has succeeded. Per-event warnings (unrecognized time zones, invalid
/// timestamps) therefore end up in the shipped package alongside the data
/// they describe.

use chrono::Utc;
use std::fmt;
use std::fs;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingest,
    Normalize,
    Aggregate,
    Output,
    System,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ingest => write!(f, "INGEST"),
            Stage::Normalize => write!(f, "NORM"),
            Stage::Aggregate => write!(f, "AGG"),
            Stage::Output => write!(f, "OUT"),
            Stage::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

/// Global logger instance.
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to record.
    min_level: LogLevel,
    /// Accumulated transcript, saved into the output package at the end of
    /// a successful run.
    transcript: String,
}

impl Logger {
    /// Initialize (or reset) the global logger.
    pub fn init(min_level: LogLevel) {
        *LOGGER.lock().unwrap() = Some(Logger {
            min_level,
            transcript: String::new(),
        });
    }

    fn log(&mut self, level: LogLevel, stage: Stage, id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let id_part = id.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let entry = format!("{} {} {}{}: {}", timestamp, level, stage, id_part, message);

        match level {
            LogLevel::Error => eprintln!("✗ {}{}: {}", stage, id_part, message),
            LogLevel::Warning => eprintln!("⚠ {}{}: {}", stage, id_part, message),
            _ => println!("{}", message),
        }

        self.transcript.push_str(&entry);
        self.transcript.push('\n');
    }
}

// ---------------------------------------------------------------------------
// Public logging functions
// ---------------------------------------------------------------------------

/// Initialize the global logger.
pub fn init(min_level: LogLevel) {
    Logger::init(min_level);
}

pub fn info(stage: Stage, id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_mut() {
        logger.log(LogLevel::Info, stage, id, message);
    }
}

pub fn warn(stage: Stage, id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_mut() {
        logger.log(LogLevel::Warning, stage, id, message);
    }
}

pub fn error(stage: Stage, id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_mut() {
        logger.log(LogLevel::Error, stage, id, message);
    }
}

pub fn debug(stage: Stage, id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_mut() {
        logger.log(LogLevel::Debug, stage, id, message);
    }
}

/// Returns a copy of the accumulated transcript. Empty if the logger was
/// never initialized.
pub fn transcript() -> String {
    LOGGER
        .lock()
        .unwrap()
        .as_ref()
        .map(|l| l.transcript.clone())
        .unwrap_or_default()
}

/// Writes the accumulated transcript to `path`.
pub fn save_transcript(path: &std::path::Path) -> std::io::Result<()> {
    fs::write(path, transcript())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_transcript_accumulates_and_filters_by_level() {
        init(LogLevel::Info);
        debug(Stage::System, None, "hidden debug line");
        warn(Stage::Normalize, Some("5522902"), "unrecognized time zone XYZ");

        let transcript = transcript();
        assert!(!transcript.contains("hidden debug line"));
        assert!(transcript.contains("WARN NORM [5522902]: unrecognized time zone XYZ"));
    }
}
