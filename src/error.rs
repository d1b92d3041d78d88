//! Centralized error handling for terrafs.
//!
//! Every fallible operation in the library returns [`Result<T>`], whose error
//! side is [`TerrafsError`]. The variants follow the operator's view of what
//! went wrong:
//!
//! ```
//! use terrafs::error::TerrafsError;
//!
//! fn describe(err: &TerrafsError) -> &'static str {
//!     match err {
//!         TerrafsError::ConfigMissing(_) => "staging directory is missing",
//!         TerrafsError::Validation(_) => "bad command or input",
//!         TerrafsError::ExternalTool { .. } => "terraform failed",
//!         TerrafsError::NotFound(_) => "no such dataset",
//!         TerrafsError::Encoding { .. } => "unsupported column type",
//!         _ => "other failure",
//!     }
//! }
//! ```
//!
//! ## Context Extension Trait
//!
//! [`ResultExt`] adds `.context()` to any `Result` whose error converts into
//! [`TerrafsError`]:
//!
//! ```no_run
//! use terrafs::error::ResultExt as _;
//!
//! fn load() -> terrafs::error::Result<String> {
//!     std::fs::read_to_string("data.json").context("Failed to read dataset")
//! }
//! ```

use std::fmt;

/// Main error type for terrafs operations.
#[derive(Debug)]
pub enum TerrafsError {
    /// The staging directory is absent or not a directory
    ConfigMissing(String),

    /// Bad operator input: missing file, unknown command, wrong arguments
    Validation(String),

    /// Non-zero exit (or spawn failure) of an external invocation
    ExternalTool {
        command: String,
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Delete requested for a dataset that has no workspace
    NotFound(String),

    /// A column type the encoder cannot build
    Encoding { field: String },

    /// I/O errors (file operations, process spawning)
    Io(std::io::Error),

    /// JSON, Arrow or Parquet processing errors
    Data(String),

    /// Generic error with context
    Other(String),
}

impl TerrafsError {
    /// True for errors caused by operator input rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

impl fmt::Display for TerrafsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigMissing(msg) => write!(f, "Configuration error: {msg}"),
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::ExternalTool {
                command,
                status,
                stdout,
                stderr,
            } => {
                match status {
                    Some(code) => write!(f, "`{command}` exited with status {code}")?,
                    None => write!(f, "`{command}` terminated without an exit status")?,
                }
                let stdout = stdout.trim();
                let stderr = stderr.trim();
                if !stdout.is_empty() {
                    write!(f, "\n{stdout}")?;
                }
                if !stderr.is_empty() {
                    write!(f, "\n{stderr}")?;
                }
                Ok(())
            }
            Self::NotFound(msg) => write!(f, "{msg}"),
            Self::Encoding { field } => write!(f, "unsupported field type for {field}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Data(msg) => write!(f, "Data processing error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for TerrafsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TerrafsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for TerrafsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for TerrafsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Data(format!("JSON error: {err}"))
    }
}

impl From<arrow::error::ArrowError> for TerrafsError {
    fn from(err: arrow::error::ArrowError) -> Self {
        Self::Data(format!("Arrow error: {err}"))
    }
}

impl From<parquet::errors::ParquetError> for TerrafsError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        Self::Data(format!("Parquet error: {err}"))
    }
}

/// Result type alias for terrafs operations.
pub type Result<T> = std::result::Result<T, TerrafsError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<TerrafsError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: TerrafsError = e.into();
            TerrafsError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: TerrafsError = e.into();
            TerrafsError::Other(format!("{}: {}", f(), err))
        })
    }
}
