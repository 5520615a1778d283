//! Global error handling for pastepack
//!
//! This module provides a centralized error type covering pre-flight
//! validation, I/O and sink delivery failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for pastepack operations
#[derive(Error, Debug)]
pub enum PastePackError {
    /// An input path does not exist
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Nothing survived discovery and filtering
    #[error("No files matched your criteria.")]
    NoFilesMatched,

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Output sink errors
    #[error("Sink error: {0}")]
    Sink(String),

    /// Clipboard errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),
}

impl PastePackError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::PathNotFound(_) => 2,
            Self::NoFilesMatched => 3,
            _ => 1,
        }
    }
}

/// Specialized Result type for pastepack operations
pub type Result<T> = std::result::Result<T, PastePackError>;

/// Creates a PastePackError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::PastePackError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Wrap the error as a sink failure prefixed with `f()`
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            PastePackError::Sink(format!("{}: {}", context, e))
        })
    }
}

// Allow `?` on pastepack results inside io::Result functions
impl From<PastePackError> for io::Error {
    fn from(err: PastePackError) -> Self {
        match err {
            PastePackError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
