//! Process-level error: a message for stderr plus the exit status to return.

use std::fmt;

use crate::io::channels::ConfigError;
use crate::settings::SettingsError;

/// Exit code for a run where at least one channel failed.
pub const EXIT_CHANNEL_FAILURES: u8 = 1;

/// Exit code for fatal configuration errors (settings or channel config).
pub const EXIT_FATAL_CONFIG: u8 = 2;

/// An error that ends the process. `main` prints it and exits with `exit_code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Aborts before any channel is processed.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(EXIT_FATAL_CONFIG, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        if err.is_validation() {
            AppError::fatal(format!("Invalid channel config: {err} (no channels were loaded)"))
        } else {
            AppError::fatal(err.to_string())
        }
    }
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        AppError::fatal(err.to_string())
    }
}
