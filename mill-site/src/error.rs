//! Error types for site assembly

use std::fmt;
use std::path::PathBuf;

use mill_core::error::PipelineError;

/// Errors that can occur while assembling a site.
///
/// I/O failures carry the rendered message instead of the `io::Error` itself
/// so that build results stay cloneable and comparable in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    /// The conversion pipeline rejected a document.
    Pipeline {
        path: PathBuf,
        source: PipelineError,
    },
    /// The template referenced a variable outside the supported set.
    UnknownTemplateVariable(String),
    /// Reading or writing a file failed.
    Io { path: PathBuf, message: String },
}

impl SiteError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        SiteError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteError::Pipeline { path, source } => {
                write!(f, "failed to process file: {}\n  {source}", path.display())
            }
            SiteError::UnknownTemplateVariable(name) => {
                write!(f, "unknown template variable: {name}")
            }
            SiteError::Io { path, message } => {
                write!(f, "{}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for SiteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SiteError::Pipeline { source, .. } => Some(source),
            _ => None,
        }
    }
}
