//! Numeric conversion errors.
//!
//! Grammar deviations never produce errors; they set the taint flag and
//! parsing continues. Converting a numeral to an in-memory number is the one
//! operation allowed to fail loudly: taint tracks *shape* violations, errors
//! report *value range* violations.

use thiserror::Error;

/// Failure to convert a numeric literal to its in-memory representation.
#[derive(Debug, Error)]
pub enum NumberError {
    /// An integer literal outside the 32-bit signed range.
    #[error("integer literal `{literal}` is out of range")]
    Int {
        /// The literal as it appeared in the input.
        literal: String,
        /// The underlying conversion failure.
        source: std::num::ParseIntError,
    },

    /// A float literal that could not be converted to a double.
    #[error("float literal `{literal}` could not be converted")]
    Float {
        /// The literal as it appeared in the input.
        literal: String,
        /// The underlying conversion failure.
        source: std::num::ParseFloatError,
    },

    /// A long float literal that could not be converted to a decimal.
    #[error("decimal literal `{literal}` could not be converted")]
    Decimal {
        /// The literal as it appeared in the input.
        literal: String,
        /// The underlying conversion failure.
        source: rust_decimal::Error,
    },
}
