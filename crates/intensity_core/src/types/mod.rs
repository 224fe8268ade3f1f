//! Core type definitions.
//!
//! This module provides the error taxonomy shared across the workspace:
//! - [`PricingError`]: Errors from pricing-model evaluation
//! - [`SolverError`]: Errors from the derivative-free optimiser
//! - [`CalibrationError`] / [`CalibrationErrorKind`]: Errors from the
//!   calibration engine

mod error;

pub use error::{CalibrationError, CalibrationErrorKind, PricingError, SolverError};
