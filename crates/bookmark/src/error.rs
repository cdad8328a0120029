//! Error types for bookmark verification.

use thiserror::Error;

/// Errors that can occur while parsing or computing bookmark values.
///
/// Neither variant is recoverable: both abort the affected test case.
#[derive(Error, Debug)]
pub enum BookmarkError {
    /// Timestamp does not match any format the connector is known to emit.
    ///
    /// Hitting this means the connector produced a new date representation
    /// and the recognized format list must be extended.
    #[error("Tests do not account for dates of this format: {0}")]
    UnsupportedFormat(String),

    /// Value handed to a canonical-format helper is not in canonical form.
    #[error("Datetime value is not of the format {expected}: {value}")]
    FormatMismatch {
        value: String,
        expected: &'static str,
    },
}
