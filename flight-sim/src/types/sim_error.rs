use std::fmt;

use logger::LoggerError;

/// Represents errors that can occur in the airfield simulator.
#[derive(Debug)]
pub enum SimError {
    InvalidInput,
    InvalidArgument(String), // Bad command line flag or configuration value
    InvalidStatus(String),   // Unknown flight status name
    EmptyCatalog(String),    // Catalog too small to generate a fleet from
    TimerLockError(String),
    TimerStartError(String),
    InvalidDuration(String),
    AlreadyRunning,
    NotRunning,
    LoggerError(String),
    Other(String), // Generic error case with a custom message
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidInput => {
                write!(f, "Invalid input. Please check your input and try again.")
            }
            SimError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            SimError::InvalidStatus(status) => write!(f, "Invalid flight status: {}", status),
            SimError::EmptyCatalog(msg) => write!(f, "Invalid catalog: {}", msg),
            SimError::TimerLockError(msg) => write!(f, "Timer lock error: {}", msg),
            SimError::TimerStartError(msg) => write!(f, "Timer start error: {}", msg),
            SimError::InvalidDuration(msg) => write!(f, "Invalid duration: {}", msg),
            SimError::AlreadyRunning => write!(f, "The simulation is already running"),
            SimError::NotRunning => write!(f, "The simulation is not running"),
            SimError::LoggerError(msg) => write!(f, "Logger error: {}", msg),
            SimError::Other(message) => write!(f, "Error: {}", message),
        }
    }
}

impl std::error::Error for SimError {}

impl From<LoggerError> for SimError {
    fn from(err: LoggerError) -> Self {
        SimError::LoggerError(err.to_string())
    }
}
