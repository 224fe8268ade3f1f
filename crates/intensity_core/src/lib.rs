//! # intensity_core: Foundation for CDS Intensity-Model Calibration
//!
//! ## Layer 1 (Foundation) Role
//!
//! intensity_core is the bottom layer of the 3-layer workspace, providing:
//! - Market data holders: `MarketDataSet`, `SpreadQuote` (`market_data`)
//! - Discount curves: `DiscountCurve`, `FlatCurve` (`market_data::curves`)
//! - Derivative-free optimisation: `NelderMeadSolver` (`math::solvers`)
//! - Calibration vocabulary: `CalibrationConfig`, `CalibrationResult`
//!   (`traits::calibration`)
//! - Error types: `PricingError`, `SolverError`, `CalibrationError`
//!   (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other intensity_* crates, with minimal
//! external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Valuation-date labels
//! - thiserror: Structured error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use intensity_core::market_data::{MarketDataSet, SpreadQuote};
//! use intensity_core::market_data::curves::{DiscountCurve, FlatCurve};
//!
//! let date = NaiveDate::from_ymd_opt(2007, 12, 31).unwrap();
//! let data = MarketDataSet::new(
//!     date,
//!     vec![
//!         SpreadQuote::new(1.0, 100.0),
//!         SpreadQuote::new(5.0, 140.0),
//!         SpreadQuote::new(3.0, 120.0),
//!     ],
//! )
//! .unwrap();
//!
//! // Quotes are held sorted by tenor regardless of input order.
//! assert_eq!(data.tenors(), vec![1.0, 3.0, 5.0]);
//!
//! let curve = FlatCurve::new(0.05_f64);
//! let df = curve.discount_factor(1.0).unwrap();
//! assert!((df - (-0.05_f64).exp()).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for market data, results, and errors

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod traits;
pub mod types;
