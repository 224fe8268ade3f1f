//! Market data error types.

use thiserror::Error;

/// Errors from market-data validation and discount-curve queries.
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarketDataError {
    /// No spread quotes were supplied; a data set needs at least one tenor.
    #[error("no spread quotes supplied")]
    NoQuotes,

    /// A quoted tenor was zero or negative.
    #[error("tenor must be positive, got {t}")]
    NonPositiveTenor {
        /// The offending tenor, in years.
        t: f64,
    },

    /// Two quotes share the same tenor.
    #[error("duplicate tenor {t}")]
    DuplicateTenor {
        /// The duplicated tenor, in years.
        t: f64,
    },

    /// A discount factor was requested for a negative maturity.
    #[error("invalid maturity: {t}")]
    InvalidMaturity {
        /// The offending maturity, in years.
        t: f64,
    },
}
