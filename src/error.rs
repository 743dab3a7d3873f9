//! Custom error types for the Iron Status application
//!
//! This module defines custom error types and implements the necessary traits
//! to properly handle errors throughout the application.

use std::fmt;

/// Main error type for the Iron Status application
#[derive(Debug)]
pub enum IronStatusError {
    /// Error occurred while reading configuration file
    ConfigRead(std::io::Error),

    /// Error occurred while parsing configuration
    ConfigParse(json5::Error),

    /// Configuration parsed but does not describe a valid bar
    ConfigInvalid(serde_json::Error),

    /// Error occurred while installing or reading a file watch
    Watch(notify::Error),

    /// Error occurred while opening the display sink
    Display(String),

    /// Generic error with a message
    Generic(String),
}

impl fmt::Display for IronStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IronStatusError::ConfigRead(e) => {
                write!(f, "Failed to read configuration file: {e}")
            }
            IronStatusError::ConfigParse(e) => {
                write!(f, "Failed to parse configuration: {e}")
            }
            IronStatusError::ConfigInvalid(e) => {
                write!(f, "Invalid configuration: {e}")
            }
            IronStatusError::Watch(e) => {
                write!(f, "File watch error: {e}")
            }
            IronStatusError::Display(msg) => {
                write!(f, "Cannot open display: {msg}")
            }
            IronStatusError::Generic(msg) => {
                write!(f, "Error: {msg}")
            }
        }
    }
}

impl std::error::Error for IronStatusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IronStatusError::ConfigRead(e) => Some(e),
            IronStatusError::ConfigParse(e) => Some(e),
            IronStatusError::ConfigInvalid(e) => Some(e),
            IronStatusError::Watch(e) => Some(e),
            IronStatusError::Display(_) | IronStatusError::Generic(_) => None,
        }
    }
}

impl From<std::io::Error> for IronStatusError {
    fn from(error: std::io::Error) -> Self {
        IronStatusError::ConfigRead(error)
    }
}

impl From<json5::Error> for IronStatusError {
    fn from(error: json5::Error) -> Self {
        IronStatusError::ConfigParse(error)
    }
}

impl From<serde_json::Error> for IronStatusError {
    fn from(error: serde_json::Error) -> Self {
        IronStatusError::ConfigInvalid(error)
    }
}

impl From<notify::Error> for IronStatusError {
    fn from(error: notify::Error) -> Self {
        IronStatusError::Watch(error)
    }
}

impl From<&str> for IronStatusError {
    fn from(msg: &str) -> Self {
        IronStatusError::Generic(msg.to_string())
    }
}

impl From<String> for IronStatusError {
    fn from(msg: String) -> Self {
        IronStatusError::Generic(msg)
    }
}

/// Result type alias using our custom error type
pub type Result<T> = std::result::Result<T, IronStatusError>;
