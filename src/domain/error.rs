//! Error types for the palette engine.
//!
//! This module defines the centralized error type [`PaletteError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Only programming errors and configuration failures surface here. Empty lists,
//! stale selections and groups without live members are ordinary states that
//! transitions resolve as no-ops, and scorer failures degrade to a zero score.

use thiserror::Error;

/// The main error type for palette engine operations.
///
/// # Examples
///
/// ```
/// use palette_machine::PaletteError;
///
/// fn validate_config() -> Result<(), PaletteError> {
///     Err(PaletteError::Config("missing list id".to_string()))
/// }
///
/// assert!(validate_config().is_err());
/// ```
#[derive(Debug, Error)]
pub enum PaletteError {
    /// A single dispatch raised more follow-up events than allowed.
    ///
    /// Almost always a transition that raises an event whose handler raises
    /// the original event again. The dispatch is abandoned and the committed
    /// context stays as it was before the event arrived.
    #[error("raise limit of {limit} follow-up events exceeded while handling `{event}`")]
    RaiseLimitExceeded {
        /// Maximum number of raised events allowed per dispatch.
        limit: usize,
        /// Wire name of the external event that started the dispatch.
        event: &'static str,
    },

    /// Composed handlers captured each other deeper than allowed.
    #[error("capture nesting deeper than {limit} levels")]
    CaptureDepthExceeded {
        /// Maximum nesting depth.
        limit: usize,
    },

    /// An event could not be decoded from its wire representation.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    ///
    /// Occurs when a configuration file cannot be parsed or holds
    /// contradictory values. The string describes the specific problem.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for palette engine operations.
///
/// This is a type alias for `std::result::Result<T, PaletteError>` that simplifies
/// function signatures throughout the codebase.
pub type Result<T> = std::result::Result<T, PaletteError>;
