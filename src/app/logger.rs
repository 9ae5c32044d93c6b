use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Number of formatted lines kept in memory for the log view
const RECENT_LIMIT: usize = 200;

/// Logger trait for writing logs to a file and displaying them in the TUI
pub trait Logger {
    /// Record a message at the given level
    fn log(&mut self, level: LogLevel, message: &str);

    /// Most recent formatted lines, oldest first
    fn recent(&self) -> Vec<String>;

    /// Get the log file path for the current session, if logs go to disk
    fn log_file_path(&self) -> Option<PathBuf>;
}

/// Log level for messages
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLevel {
    /// Debug level for detailed information
    Debug,
    /// Info level for general information
    Info,
    /// Warning level for potential issues
    Warning,
    /// Error level for error conditions
    Error,
}

impl LogLevel {
    /// Get a string representation of the log level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Get a color code for the log level
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m",   // Cyan
            LogLevel::Info => "\x1b[32m",    // Green
            LogLevel::Warning => "\x1b[33m", // Yellow
            LogLevel::Error => "\x1b[31m",   // Red
        }
    }
}

/// Format a log message with level, timestamp, and message
pub fn format_log(level: LogLevel, message: &str) -> String {
    let now = chrono::Local::now();
    let timestamp = now.format("%Y-%m-%d %H:%M:%S%.3f");

    format!("[{}] [{}] {}", timestamp, level.as_str(), message)
}

/// Format a log message with color for terminal display
pub fn format_log_with_color(level: LogLevel, message: &str) -> String {
    let now = chrono::Local::now();
    let timestamp = now.format("%Y-%m-%d %H:%M:%S%.3f");
    let reset = "\x1b[0m";

    format!(
        "[{}] [{}{}{}] {}",
        timestamp,
        level.color_code(),
        level.as_str(),
        reset,
        message
    )
}

fn push_recent(recent: &mut VecDeque<String>, line: String) {
    if recent.len() == RECENT_LIMIT {
        recent.pop_front();
    }
    recent.push_back(line);
}

/// Appends to `<log_dir>/session-<timestamp>.log`
pub struct FileLogger {
    log_file_path: PathBuf,
    recent: VecDeque<String>,
}

impl FileLogger {
    pub fn new(log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
        let file_name = format!(
            "session-{}.log",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );

        Ok(Self {
            log_file_path: log_dir.join(file_name),
            recent: VecDeque::new(),
        })
    }

    fn write_log_to_file(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

impl Logger for FileLogger {
    fn log(&mut self, level: LogLevel, message: &str) {
        let line = format_log(level, message);
        if let Err(e) = self.write_log_to_file(&line) {
            // Keep the failure visible in the log view
            push_recent(
                &mut self.recent,
                format_log(LogLevel::Error, &format!("Failed to write log file: {}", e)),
            );
        }
        push_recent(&mut self.recent, line);
    }

    fn recent(&self) -> Vec<String> {
        self.recent.iter().cloned().collect()
    }

    fn log_file_path(&self) -> Option<PathBuf> {
        Some(self.log_file_path.clone())
    }
}

/// In-memory only; used by tests and when the log directory is unwritable
#[derive(Default)]
pub struct MemoryLogger {
    recent: VecDeque<String>,
    entries: Vec<(LogLevel, String)>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[(LogLevel, String)] {
        &self.entries
    }
}

impl Logger for MemoryLogger {
    fn log(&mut self, level: LogLevel, message: &str) {
        self.entries.push((level, message.to_string()));
        push_recent(&mut self.recent, format_log(level, message));
    }

    fn recent(&self) -> Vec<String> {
        self.recent.iter().cloned().collect()
    }

    fn log_file_path(&self) -> Option<PathBuf> {
        None
    }
}
