use thiserror::Error;

/// Errors returned by a single fee calculation.
///
/// An out-of-range discount is deliberately absent here: the discount
/// applier normalizes it to "no discount" instead of failing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeeError {
    /// The base amount is missing, non-numeric, or negative.
    ///
    /// No partial result accompanies this error, so callers can tell
    /// "no valid input yet" apart from a legitimately zero fee.
    #[error("invalid base amount: {0}")]
    InvalidAmount(String),

    /// The category is outside the closed enumeration, or the injected
    /// schedule defines no rates for it.
    #[error("unknown service category '{0}'")]
    UnknownCategory(String),

    /// A decimal product exceeded the representable range.
    #[error("fee calculation overflowed the decimal range")]
    Overflow,
}
