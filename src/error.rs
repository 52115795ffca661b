//! Error types for the memcpy lifting pass

use crate::il::ExprId;
use thiserror::Error;

/// Pass errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Host symbol errors
    /// Copy primitive could not be resolved in the binary view
    ///
    /// **Triggered by:** A binary that neither imports nor defines the copy primitive
    /// **Example:** Stripped firmware without a `memcpy` symbol
    /// **Recovery:** The affected rewrite is skipped, remaining rewrites proceed
    #[error("Symbol not found: {name}")]
    SymbolNotFound {
        /// Symbol name that was looked up
        name: String,
    },

    // IL errors
    /// Expression handle does not name an expression of the function
    #[error("Invalid expression: {0}")]
    InvalidExpr(ExprId),

    /// Operand list handle does not name an operand list of the function
    #[error("Invalid operand list: #{0}")]
    InvalidOperandList(usize),

    /// Copy length does not fit a signed constant node
    ///
    /// **Triggered by:** A hand-built record whose length exceeds `i64::MAX`
    /// **Recovery:** The affected rewrite is skipped
    #[error("Copy length 0x{0:x} does not fit a constant")]
    LengthOverflow(u64),

    // Configuration
    /// Pass configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    // Workflow
    /// Workflow refused the activity
    #[error("Cannot register activity {activity}: {reason}")]
    Registration {
        /// Activity name
        activity: String,
        /// Why the workflow refused it
        reason: String,
    },
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that cannot be recovered from
    Fatal,
    /// Error that skips one unit of work but lets the pass continue
    Recoverable,
}

impl Error {
    /// Create a configuration error with a message
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Classify error severity
    pub fn classify(&self) -> ErrorSeverity {
        match self {
            Error::Config(_) => ErrorSeverity::Fatal,
            Error::Registration { .. } => ErrorSeverity::Fatal,

            Error::SymbolNotFound { .. } => ErrorSeverity::Recoverable,
            Error::InvalidExpr(_) => ErrorSeverity::Recoverable,
            Error::InvalidOperandList(_) => ErrorSeverity::Recoverable,
            Error::LengthOverflow(_) => ErrorSeverity::Recoverable,
        }
    }
}

/// Result type for pass operations
pub type Result<T> = std::result::Result<T, Error>;
