use chrono::Utc;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum LogLevel {
    Info(Color),
    Warn,
    Error,
}

impl LogLevel {
    fn tag(&self) -> &'static str {
        match self {
            LogLevel::Info(_) => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    White,
}

impl Color {
    fn to_ansi_code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Blue => "\x1b[34m",
            Color::Yellow => "\x1b[33m",
            Color::Cyan => "\x1b[36m",
            Color::Magenta => "\x1b[35m",
            Color::White => "\x1b[37m",
        }
    }
}

/// Appends timestamped lines to `<log_dir>/<name>.log`, optionally echoing
/// them to the console in color.
#[derive(Debug, Clone)]
pub struct Logger {
    log_file: PathBuf,
    echo_to_console: bool,
}

impl Logger {
    /// Creates a new `Logger` instance.
    ///
    /// # Parameters
    /// - `log_dir`: Directory for the log file. Created when missing.
    /// - `name`: Name of the component writing the log, used as the file name.
    ///
    /// # Returns
    /// A new `Logger` instance with an empty log file.
    pub fn new(log_dir: &Path, name: &str) -> Result<Self, LoggerError> {
        if log_dir.exists() && !log_dir.is_dir() {
            return Err(LoggerError::InvalidPath(
                "Provided path is not a directory.".into(),
            ));
        }
        std::fs::create_dir_all(log_dir)?;

        // Keep the file name free of path separators
        let sanitized_name = name.replace(['/', '\\', ':'], "_");
        let log_file = log_dir.join(format!("{}.log", sanitized_name));

        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&log_file)?;

        Ok(Logger {
            log_file,
            echo_to_console: false,
        })
    }

    /// Also print every line to stdout.
    pub fn with_console(mut self, echo_to_console: bool) -> Self {
        self.echo_to_console = echo_to_console;
        self
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    fn log(&self, level: LogLevel, message: &str) -> Result<(), LoggerError> {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        let log_message = format!("[{}] [{}]: {}\n", level.tag(), timestamp, message);

        if self.echo_to_console {
            let colored_message = match &level {
                LogLevel::Info(color) => format!("{}{}\x1b[0m", color.to_ansi_code(), log_message),
                LogLevel::Warn => format!("\x1b[93m{}\x1b[0m", log_message), // Bright Yellow
                LogLevel::Error => format!("\x1b[91m{}\x1b[0m", log_message), // Bright Red
            };
            print!("{}", colored_message);
            io::stdout().flush()?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;
        file.write_all(log_message.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    /// Logs an informational message, colored when echoed to the console.
    pub fn info(&self, message: &str, color: Color) -> Result<(), LoggerError> {
        self.log(LogLevel::Info(color), message)
    }

    /// Logs a warning message.
    pub fn warn(&self, message: &str) -> Result<(), LoggerError> {
        self.log(LogLevel::Warn, message)
    }

    /// Logs an error message.
    pub fn error(&self, message: &str) -> Result<(), LoggerError> {
        self.log(LogLevel::Error, message)
    }
}

#[derive(Debug)]
pub enum LoggerError {
    IoError(std::io::Error),
    InvalidPath(String),
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::IoError(e) => write!(f, "I/O Error: {}", e),
            LoggerError::InvalidPath(msg) => write!(f, "Invalid Path: {}", msg),
        }
    }
}

impl std::error::Error for LoggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggerError::IoError(e) => Some(e),
            LoggerError::InvalidPath(_) => None,
        }
    }
}

impl From<std::io::Error> for LoggerError {
    fn from(err: std::io::Error) -> Self {
        LoggerError::IoError(err)
    }
}
