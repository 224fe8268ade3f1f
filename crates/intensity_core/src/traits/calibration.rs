//! Calibration configuration and result vocabulary.
//!
//! These types are the contract between the calibration engine and its
//! drivers: a [`CalibrationConfig`] bounds the optimiser's effort, and a
//! [`CalibrationResult`] carries the fitted vector together with its
//! convergence status.
//!
//! Non-convergence is a warning, not a failure: when the iteration budget
//! runs out, the best-effort parameter vector is still returned with
//! `converged == false`, and downstream reporting must carry that flag.

use std::fmt;

/// Configuration for a calibration run.
///
/// Controls the optimiser's convergence criteria and iteration budget.
/// The budget doubles as the cancellation surrogate for long-running
/// fits: there are no other suspension points in a calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationConfig {
    /// Maximum number of optimiser iterations.
    pub max_iterations: usize,
    /// Convergence tolerance on the objective.
    pub tolerance: f64,
    /// Convergence tolerance on the parameter vector.
    pub param_tolerance: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            tolerance: 1e-8,
            param_tolerance: 1e-8,
        }
    }
}

impl CalibrationConfig {
    /// Create a new configuration with the given tolerance and budget.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    /// Create a fast configuration for quick fits.
    pub fn fast() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-6,
            param_tolerance: 1e-6,
        }
    }

    /// Create a high precision configuration.
    pub fn high_precision() -> Self {
        Self {
            max_iterations: 5000,
            tolerance: 1e-12,
            param_tolerance: 1e-12,
        }
    }
}

/// Result of a calibration run.
///
/// Contains the fitted parameters, convergence status, and diagnostics.
///
/// # Example
///
/// ```
/// use intensity_core::traits::calibration::CalibrationResult;
///
/// let result = CalibrationResult::converged(vec![0.0123], 64, 1e-12);
/// assert!(result.converged);
/// assert!(result.rmse(3) < 1e-5);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationResult<P> {
    /// Fitted parameters (best-effort when `converged` is false).
    pub params: P,
    /// Whether the optimiser met its tolerance within the budget.
    pub converged: bool,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Objective value (residual sum of squares) at the fitted parameters.
    pub residual_ss: f64,
    /// Optional message with convergence details.
    pub message: Option<String>,
}

impl<P> CalibrationResult<P> {
    /// Create a successful (converged) result.
    pub fn converged(params: P, iterations: usize, residual_ss: f64) -> Self {
        Self {
            params,
            converged: true,
            iterations,
            residual_ss,
            message: None,
        }
    }

    /// Create a best-effort (not converged) result.
    pub fn not_converged(params: P, iterations: usize, residual_ss: f64, reason: String) -> Self {
        Self {
            params,
            converged: false,
            iterations,
            residual_ss,
            message: Some(reason),
        }
    }

    /// Add a message to the result.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Root-mean-square error over `n_observations` tenors.
    ///
    /// `sqrt(residual_ss / N)` — divides by the observation count, never
    /// a degrees-of-freedom adjustment.
    pub fn rmse(&self, n_observations: usize) -> f64 {
        if n_observations == 0 {
            return f64::NAN;
        }
        (self.residual_ss / n_observations as f64).sqrt()
    }
}

impl<P: fmt::Debug> fmt::Display for CalibrationResult<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CalibrationResult {{ converged: {}, iterations: {}, residual_ss: {:.6e} }}",
            self.converged, self.iterations, self.residual_ss
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CalibrationConfig::default();
        assert_eq!(config.max_iterations, 2000);
        assert!(config.tolerance > 0.0);
    }

    #[test]
    fn test_config_new() {
        let config = CalibrationConfig::new(1e-6, 100);
        assert_eq!(config.max_iterations, 100);
        assert!((config.tolerance - 1e-6).abs() < 1e-15);
    }

    #[test]
    fn test_config_fast() {
        let config = CalibrationConfig::fast();
        assert!(config.max_iterations <= 500);
        assert!(config.tolerance >= 1e-8);
    }

    #[test]
    fn test_config_high_precision() {
        let config = CalibrationConfig::high_precision();
        assert!(config.max_iterations >= 5000);
        assert!(config.tolerance <= 1e-10);
    }

    #[test]
    fn test_result_converged() {
        let result: CalibrationResult<Vec<f64>> =
            CalibrationResult::converged(vec![0.01], 10, 0.001);
        assert!(result.converged);
        assert_eq!(result.iterations, 10);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_result_not_converged() {
        let result: CalibrationResult<Vec<f64>> = CalibrationResult::not_converged(
            vec![0.01],
            2000,
            1.0,
            "iteration budget exhausted".to_string(),
        );
        assert!(!result.converged);
        assert!(result.message.is_some());
    }

    #[test]
    fn test_result_rmse() {
        let result: CalibrationResult<Vec<f64>> = CalibrationResult::converged(vec![1.0], 10, 4.0);
        assert!((result.rmse(4) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_result_rmse_zero_observations() {
        let result: CalibrationResult<Vec<f64>> = CalibrationResult::converged(vec![1.0], 10, 4.0);
        assert!(result.rmse(0).is_nan());
    }

    #[test]
    fn test_result_display() {
        let result: CalibrationResult<Vec<f64>> =
            CalibrationResult::converged(vec![1.0], 10, 1e-4);
        let display = format!("{}", result);
        assert!(display.contains("converged: true"));
        assert!(display.contains("iterations: 10"));
    }

    #[test]
    fn test_result_with_message() {
        let result: CalibrationResult<f64> =
            CalibrationResult::converged(1.0, 5, 0.0).with_message("refit");
        assert_eq!(result.message, Some("refit".to_string()));
    }
}
