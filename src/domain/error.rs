//! Domain validation errors for core domain types.
//!
//! Returned by the `parse` constructors of identifiers and by fee schedule
//! validation when an invariant is violated.

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// ASINs are exactly ten ASCII alphanumeric characters.
    #[error("invalid ASIN '{value}'")]
    InvalidAsin {
        /// The rejected input.
        value: String,
    },

    /// JAN codes are 8 or 13 digits.
    #[error("invalid JAN code '{value}'")]
    InvalidJan {
        /// The rejected input.
        value: String,
    },

    /// A fee schedule cannot be used as configured.
    #[error("invalid fee schedule: {reason}")]
    InvalidFeeSchedule {
        /// Why the schedule was rejected.
        reason: String,
    },
}
