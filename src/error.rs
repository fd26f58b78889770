//! Error types for the Polydict library.
//!
//! All errors are represented by the [`PolydictError`] enum. Dictionary lookup,
//! request decoding, engine instantiation and tokenization each get their own
//! variant so the serving layer can decide what to show a caller and what to
//! keep in the logs.
//!
//! # Examples
//!
//! ```
//! use polydict::error::{PolydictError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(PolydictError::invalid_request("missing 'text' parameter"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Polydict operations.
#[derive(Error, Debug)]
pub enum PolydictError {
    /// I/O errors (file operations, network, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A dictionary name could not be resolved.
    #[error("Cannot find dictionary - {0}")]
    NotFound(String),

    /// Percent-encoding or charset decoding of request text failed.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// The engine behind a dictionary could not be constructed.
    #[error("Engine for dictionary '{dictionary}' is unavailable: {reason}")]
    EngineUnavailable { dictionary: String, reason: String },

    /// The engine raised while analysing text.
    #[error("Tokenization with dictionary '{dictionary}' failed: {reason}")]
    Tokenization { dictionary: String, reason: String },

    /// The diagram renderer failed or timed out.
    #[error("Render error: {0}")]
    Render(String),

    /// A request was missing or carried malformed parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with PolydictError.
pub type Result<T> = std::result::Result<T, PolydictError>;

impl PolydictError {
    /// Error for a lookup of the default dictionary when nothing is registered.
    pub fn no_dictionaries() -> Self {
        PolydictError::NotFound("no dictionaries available".to_string())
    }

    /// Error for a lookup of a name that is not registered.
    pub fn unknown_dictionary<S: AsRef<str>>(name: S) -> Self {
        PolydictError::NotFound(format!("unknown dictionary '{}'", name.as_ref()))
    }

    /// Create a new decoding error.
    pub fn decoding<S: Into<String>>(msg: S) -> Self {
        PolydictError::Decoding(msg.into())
    }

    /// Create a new engine unavailable error.
    pub fn engine_unavailable<D: Into<String>, S: Into<String>>(dictionary: D, reason: S) -> Self {
        PolydictError::EngineUnavailable {
            dictionary: dictionary.into(),
            reason: reason.into(),
        }
    }

    /// Create a new tokenization error.
    pub fn tokenization<D: Into<String>, S: Into<String>>(dictionary: D, reason: S) -> Self {
        PolydictError::Tokenization {
            dictionary: dictionary.into(),
            reason: reason.into(),
        }
    }

    /// Create a new render error.
    pub fn render<S: Into<String>>(msg: S) -> Self {
        PolydictError::Render(msg.into())
    }

    /// Create a new invalid request error.
    pub fn invalid_request<S: Into<String>>(msg: S) -> Self {
        PolydictError::InvalidRequest(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        PolydictError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PolydictError::Other(msg.into())
    }

    /// Whether this error is one of the engine failures that must never be
    /// shown verbatim to a remote caller.
    pub fn is_engine_failure(&self) -> bool {
        matches!(
            self,
            PolydictError::EngineUnavailable { .. } | PolydictError::Tokenization { .. }
        )
    }
}
