//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors from pricing-model evaluation
//! - `SolverError`: Errors from the derivative-free optimiser
//! - `CalibrationError`: Errors from the calibration engine
//!
//! Non-convergence is deliberately absent from this taxonomy: exhausting the
//! iteration budget is a warning carried by
//! [`CalibrationResult::converged`](crate::traits::calibration::CalibrationResult),
//! not an error. The best-effort parameter vector is always retained.

use std::fmt;
use thiserror::Error;

/// Errors raised while evaluating a pricing model at a candidate
/// parameter vector.
///
/// A model that is mathematically undefined for a candidate vector must
/// fail with `InvalidParameter` rather than returning NaN or a sentinel,
/// so the optimiser's caller can react.
///
/// # Examples
/// ```
/// use intensity_core::types::PricingError;
///
/// let err = PricingError::InvalidParameter("sigma must be positive".to_string());
/// assert_eq!(format!("{}", err), "invalid parameter: sigma must be positive");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PricingError {
    /// The candidate vector leaves the model mathematically undefined
    /// (e.g. a negative variance term, division by zero in a survival
    /// probability).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The evaluation produced a non-finite or otherwise unusable value.
    #[error("numerical instability: {0}")]
    NumericalInstability(String),
}

/// Errors raised by the Nelder-Mead solver itself.
///
/// Objective-function failures are not represented here; they propagate
/// through [`NelderMeadSolver::solve`](crate::math::solvers::NelderMeadSolver::solve)
/// in the caller's own error type.
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// The initial guess had zero components.
    #[error("empty parameter vector")]
    EmptyParameterVector,

    /// The objective returned a non-finite value.
    #[error("objective is not finite (value: {value})")]
    NonFiniteObjective {
        /// The non-finite value produced by the objective.
        value: f64,
    },

    /// Numerical instability during the simplex update.
    #[error("numerical instability: {0}")]
    NumericalInstability(String),
}

/// Calibration error kind.
///
/// Categorises the type of calibration failure.
///
/// # Variants
/// - `NotCalibrated`: A fit-dependent query was made before `calibrate()`
/// - `MissingInput`: The builder was finalised without all required inputs
/// - `DimensionMismatch`: Guess length disagrees with the model's declared
///   parameter count for the bound tenor grid
/// - `InvalidParameter`: A candidate vector left the pricing model undefined
/// - `NumericalInstability`: Numerical issues during calibration
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalibrationErrorKind {
    /// RMSE, report, or parameter presentation requested before a
    /// calibrated vector exists.
    #[error("no calibrated parameter vector: call calibrate() first")]
    NotCalibrated,

    /// A required input was never bound to the builder.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// Parameter-vector length disagrees with the model's declared count.
    #[error("dimension mismatch: expected {expected} parameters, got {got}")]
    DimensionMismatch {
        /// Parameter count the bound model expects for the current grid.
        expected: usize,
        /// Parameter count actually supplied.
        got: usize,
    },

    /// Invalid parameter value during objective evaluation.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Numerical instability during calibration.
    #[error("numerical instability")]
    NumericalInstability,
}

/// Calibration error with diagnostics.
///
/// Carries the failure kind alongside whatever the engine knew when the
/// attempt aborted: iteration count, residual sum of squares, and the
/// candidate parameter values if any were produced.
///
/// # Examples
/// ```
/// use intensity_core::types::{CalibrationError, CalibrationErrorKind};
///
/// let err = CalibrationError::dimension_mismatch(3, 1);
/// assert!(matches!(
///     err.kind,
///     CalibrationErrorKind::DimensionMismatch { expected: 3, got: 1 }
/// ));
///
/// let err = CalibrationError::not_calibrated();
/// assert!(err.is_state_error());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationError {
    /// The type of calibration error.
    pub kind: CalibrationErrorKind,

    /// Number of optimiser iterations performed before the failure.
    pub iterations: usize,

    /// Residual sum of squares at the point of failure, when known.
    pub residual_ss: Option<f64>,

    /// Detailed error message.
    pub message: Option<String>,

    /// Candidate parameter values at the point of failure (if available).
    pub parameter_values: Option<Vec<f64>>,
}

impl CalibrationError {
    /// Create a new calibration error of the given kind.
    pub fn new(kind: CalibrationErrorKind) -> Self {
        Self {
            kind,
            iterations: 0,
            residual_ss: None,
            message: None,
            parameter_values: None,
        }
    }

    /// Create a state error: a fit-dependent query arrived before
    /// `calibrate()` produced a parameter vector.
    pub fn not_calibrated() -> Self {
        Self::new(CalibrationErrorKind::NotCalibrated)
    }

    /// Create a state error: the builder was finalised without the named
    /// input.
    pub fn missing_input(input: impl Into<String>) -> Self {
        Self::new(CalibrationErrorKind::MissingInput(input.into()))
    }

    /// Create a dimension-mismatch error.
    ///
    /// # Arguments
    /// * `expected` - Parameter count the model declares for the bound grid
    /// * `got` - Parameter count actually supplied
    pub fn dimension_mismatch(expected: usize, got: usize) -> Self {
        Self::new(CalibrationErrorKind::DimensionMismatch { expected, got })
    }

    /// Create an invalid-parameter error.
    ///
    /// # Arguments
    /// * `message` - Description of the invalid parameter
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        let msg = message.into();
        Self {
            kind: CalibrationErrorKind::InvalidParameter(msg.clone()),
            iterations: 0,
            residual_ss: None,
            message: Some(msg),
            parameter_values: None,
        }
    }

    /// Create a numerical-instability error.
    ///
    /// # Arguments
    /// * `message` - Description of the numerical issue
    pub fn numerical_instability(message: impl Into<String>) -> Self {
        Self {
            kind: CalibrationErrorKind::NumericalInstability,
            iterations: 0,
            residual_ss: None,
            message: Some(message.into()),
            parameter_values: None,
        }
    }

    /// Set the candidate parameter values.
    pub fn with_parameters(mut self, params: Vec<f64>) -> Self {
        self.parameter_values = Some(params);
        self
    }

    /// Set the residual sum of squares.
    pub fn with_residual(mut self, residual_ss: f64) -> Self {
        self.residual_ss = Some(residual_ss);
        self
    }

    /// Set the iteration count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set a detailed message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Check whether this is a state error (query or build out of order).
    pub fn is_state_error(&self) -> bool {
        matches!(
            self.kind,
            CalibrationErrorKind::NotCalibrated | CalibrationErrorKind::MissingInput(_)
        )
    }

    /// Check whether this is a dimension mismatch.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self.kind, CalibrationErrorKind::DimensionMismatch { .. })
    }

    /// Check whether this is an invalid-parameter error.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self.kind, CalibrationErrorKind::InvalidParameter(_))
    }
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Calibration error: {}", self.kind)?;
        if let Some(ref msg) = self.message {
            if !matches!(self.kind, CalibrationErrorKind::InvalidParameter(_)) {
                write!(f, " - {}", msg)?;
            }
        }
        if self.iterations > 0 {
            write!(f, " (after {} iterations)", self.iterations)?;
        }
        if let Some(residual_ss) = self.residual_ss {
            write!(f, " [residual_ss: {:.6e}]", residual_ss)?;
        }
        Ok(())
    }
}

impl std::error::Error for CalibrationError {}

impl From<SolverError> for CalibrationError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::EmptyParameterVector => {
                CalibrationError::invalid_parameter("empty parameter vector")
            }
            SolverError::NonFiniteObjective { value } => CalibrationError::numerical_instability(
                format!("objective is not finite (value: {})", value),
            ),
            SolverError::NumericalInstability(msg) => {
                CalibrationError::numerical_instability(msg)
            }
        }
    }
}

impl From<PricingError> for CalibrationError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidParameter(msg) => CalibrationError::invalid_parameter(msg),
            PricingError::NumericalInstability(msg) => {
                CalibrationError::numerical_instability(msg)
            }
        }
    }
}
