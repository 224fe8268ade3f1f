//! Market data holders and discount curves.
//!
//! This module provides the read-only inputs shared by every calibration:
//! - [`MarketDataSet`] / [`SpreadQuote`]: ordered tenor/spread observations
//!   for one valuation date
//! - [`curves`]: the [`DiscountCurve`](curves::DiscountCurve) trait and its
//!   flat implementation
//! - [`MarketDataError`]: validation and curve errors

pub mod curves;
mod error;
mod quotes;

pub use curves::{DiscountCurve, FlatCurve};
pub use error::MarketDataError;
pub use quotes::{MarketDataSet, SpreadQuote};
