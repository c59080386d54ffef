// ABOUTME: Error types for the block importer including the ErrorCode enum and ImportError struct.
// ABOUTME: Provides categorized errors with convenience constructors, boolean helpers and reportable issues.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error codes representing different categories of import failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UnknownBlockKind,
    InvalidSelector,
    Config,
    Io,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::UnknownBlockKind => "unknown block kind",
            ErrorCode::InvalidSelector => "invalid selector",
            ErrorCode::Config => "configuration error",
            ErrorCode::Io => "I/O error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for import operations.
#[derive(Debug, thiserror::Error)]
pub struct ImportError {
    pub code: ErrorCode,
    pub op: String,
    pub subject: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "importer: {} {}: {}", self.op, self.subject, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ImportError {
    /// Create an UnknownBlockKind error for a kind with no registered parser.
    pub fn unknown_block_kind(kind: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::UnknownBlockKind,
            subject: kind.into(),
            op: op.into(),
            source: None,
        }
    }

    /// Create an InvalidSelector error.
    pub fn invalid_selector(selector: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidSelector,
            subject: selector.into(),
            op: op.into(),
            source: None,
        }
    }

    /// Create a Config error.
    pub fn config(
        subject: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Config,
            subject: subject.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an Io error.
    pub fn io(
        path: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Io,
            subject: path.into(),
            op: op.into(),
            source,
        }
    }

    /// Returns true if this is an UnknownBlockKind error.
    pub fn is_unknown_block_kind(&self) -> bool {
        self.code == ErrorCode::UnknownBlockKind
    }

    /// Returns true if this is an InvalidSelector error.
    pub fn is_invalid_selector(&self) -> bool {
        self.code == ErrorCode::InvalidSelector
    }

    /// Returns true if this is a Config error.
    pub fn is_config(&self) -> bool {
        self.code == ErrorCode::Config
    }

    /// Returns true if this is an Io error.
    pub fn is_io(&self) -> bool {
        self.code == ErrorCode::Io
    }
}

/// A reportable, non-fatal problem recorded during an import pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&ImportError> for Issue {
    fn from(err: &ImportError) -> Self {
        Self {
            code: err.code,
            message: err.to_string(),
        }
    }
}
