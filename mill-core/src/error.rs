//! Error types for the markup pipeline

use std::fmt;

/// Errors that can occur while lexing or preprocessing one document.
///
/// All variants are fatal for the document that produced them; the build
/// orchestration decides whether the run continues with the next document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A delimited construct (front matter, code fence, raw HTML block,
    /// bracketed reference, inline code) was never terminated, or its
    /// terminator did not match the opening delimiter.
    MalformedFence {
        /// What the lexer was looking for (e.g. "closing front matter fence `---`").
        expected: String,
        /// 1-based line of the raw buffer where the search started.
        line: usize,
        /// 0-based column of the raw buffer where the search started.
        column: usize,
    },
    /// An injection fence named an extension that is not registered.
    UnknownInjectionParameter(String),
    /// A registered injection function failed while producing its content.
    Injection(String),
    /// A `Reference` open event had no matching close event in the stream.
    ///
    /// The lexer always emits references in pairs, so hitting this means the
    /// event stream was constructed or truncated by hand.
    UnpairedReference,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MalformedFence {
                expected,
                line,
                column,
            } => {
                write!(f, "expected to find {expected} after {line}:{column}")
            }
            PipelineError::UnknownInjectionParameter(name) => {
                write!(f, "cannot inject value for unknown parameter name: {name}")
            }
            PipelineError::Injection(msg) => write!(f, "injection failed: {msg}"),
            PipelineError::UnpairedReference => {
                write!(f, "reference open event without a matching close")
            }
        }
    }
}

impl std::error::Error for PipelineError {}
