//! # intensity_calibration
//!
//! Calibration engine fitting CDS intensity models to market par spreads.
//!
//! This crate sits above `intensity_core` (L1) and `intensity_models` (L2),
//! solving the inverse problem: given a curve of market spreads, find the
//! intensity parameters that reproduce them.
//!
//! ## Modules
//!
//! - `engine`: Builder and calibration state machine (bind inputs, fit,
//!   query)
//! - `objective`: Sum-of-squared spread errors, the scalar the optimiser
//!   minimises
//! - `report`: Immutable goodness-of-fit report and parameter presentation
//! - `batch`: Parallel calibration of independent model families
//!
//! ## Example
//!
//! ```rust,ignore
//! use intensity_calibration::prelude::*;
//!
//! let mut calibration = CalibrationBuilder::new()
//!     .with_model(HomogeneousPoisson::new())
//!     .with_market_data(market_data)
//!     .with_curve(FlatCurve::new(0.0))
//!     .build()?;
//!
//! let result = calibration.calibrate()?;
//! println!("{}", calibration.report()?);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod batch;
pub mod engine;
pub mod objective;
pub mod report;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::batch::calibrate_batch;
    pub use crate::engine::{Calibration, CalibrationBuilder};
    pub use crate::objective::sum_squared_spread_error;
    pub use crate::report::{CalibrationReport, ReportRow};
    pub use intensity_core::market_data::{FlatCurve, MarketDataSet, SpreadQuote};
    pub use intensity_core::traits::calibration::{CalibrationConfig, CalibrationResult};
    pub use intensity_core::types::{CalibrationError, CalibrationErrorKind};
    pub use intensity_models::credit::{
        CirIntensity, HomogeneousPoisson, InhomogeneousPoisson, IntensityModel,
    };
}
