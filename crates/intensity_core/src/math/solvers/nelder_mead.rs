//! Nelder-Mead downhill-simplex minimiser.
//!
//! This module provides the [`NelderMeadSolver`] for minimising scalar
//! objective functions without derivatives, as used for intensity-model
//! calibration.
//!
//! # Algorithm
//!
//! A simplex of `n + 1` vertices walks the objective surface through
//! reflection, expansion, contraction, and shrink steps (Nelder and Mead,
//! 1965). The initial simplex perturbs each coordinate of the guess by 5%
//! (or a small absolute step where the coordinate is zero).
//!
//! # Error propagation
//!
//! The objective returns `Result<f64, E>`. A domain error from the
//! objective (for example an invalid-parameter failure inside a pricing
//! model) aborts the run and propagates to the caller; it is never
//! swallowed or replaced by a sentinel value. Exhausting the iteration
//! budget is not an error: the best vertex is returned with
//! `converged: false`.

use crate::types::SolverError;

/// Configuration for the Nelder-Mead solver.
///
/// # Fields
///
/// * `tolerance` - Convergence tolerance on the objective spread across
///   the simplex
/// * `param_tolerance` - Convergence tolerance on the simplex diameter
/// * `max_iterations` - Iteration budget
/// * `reflection` / `expansion` / `contraction` / `shrink` - Standard
///   simplex coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMeadConfig {
    /// Convergence tolerance on the objective spread across the simplex.
    pub tolerance: f64,
    /// Convergence tolerance on the simplex diameter.
    pub param_tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Reflection coefficient (alpha).
    pub reflection: f64,
    /// Expansion coefficient (gamma).
    pub expansion: f64,
    /// Contraction coefficient (rho).
    pub contraction: f64,
    /// Shrink coefficient (sigma).
    pub shrink: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            param_tolerance: 1e-8,
            max_iterations: 2000,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
        }
    }
}

impl NelderMeadConfig {
    /// Create a new configuration.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    /// Create a fast configuration with relaxed tolerances.
    pub fn fast() -> Self {
        Self {
            tolerance: 1e-6,
            param_tolerance: 1e-6,
            max_iterations: 500,
            ..Default::default()
        }
    }

    /// Create a high precision configuration.
    pub fn high_precision() -> Self {
        Self {
            tolerance: 1e-12,
            param_tolerance: 1e-12,
            max_iterations: 5000,
            ..Default::default()
        }
    }
}

/// Result of a Nelder-Mead minimisation.
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMeadResult {
    /// Best parameter vector found.
    pub params: Vec<f64>,
    /// Objective value at the best vertex.
    pub objective: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Number of objective evaluations performed.
    pub evaluations: usize,
    /// Whether both convergence tolerances were met within the budget.
    pub converged: bool,
}

/// Nelder-Mead downhill-simplex minimiser.
///
/// Solves problems of the form:
/// ```text
/// min_p f(p)
/// ```
/// where `f` is a scalar black-box objective and `p` is a parameter
/// vector of any dimensionality.
///
/// # Example
///
/// ```
/// use intensity_core::math::solvers::{NelderMeadConfig, NelderMeadSolver};
/// use intensity_core::types::SolverError;
///
/// let solver = NelderMeadSolver::new(NelderMeadConfig::default());
///
/// // Minimise (p - 3)^2
/// let result = solver
///     .solve(
///         |p: &[f64]| -> Result<f64, SolverError> { Ok((p[0] - 3.0).powi(2)) },
///         vec![10.0],
///     )
///     .unwrap();
///
/// assert!(result.converged);
/// assert!((result.params[0] - 3.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct NelderMeadSolver {
    config: NelderMeadConfig,
}

// Initial-simplex steps: 5% of each non-zero coordinate, small absolute
// step at zero.
const NONZERO_STEP: f64 = 0.05;
const ZERO_STEP: f64 = 0.00025;

impl NelderMeadSolver {
    /// Create a new solver with the given configuration.
    pub fn new(config: NelderMeadConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: NelderMeadConfig::default(),
        }
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &NelderMeadConfig {
        &self.config
    }

    /// Minimise `objective` starting from `initial`.
    ///
    /// # Arguments
    ///
    /// * `objective` - Scalar objective; a returned error aborts the run
    /// * `initial` - Initial parameter guess (fixes the dimensionality)
    ///
    /// # Returns
    ///
    /// * `Ok(NelderMeadResult)` - Best vertex found; `converged` is false
    ///   when the iteration budget ran out first
    /// * `Err(E)` - An objective failure, or a solver failure converted
    ///   through `E: From<SolverError>`
    pub fn solve<F, E>(&self, mut objective: F, initial: Vec<f64>) -> Result<NelderMeadResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
        E: From<SolverError>,
    {
        let dim = initial.len();
        if dim == 0 {
            return Err(SolverError::EmptyParameterVector.into());
        }

        let mut evaluations = 0usize;
        let mut eval = |x: &[f64], count: &mut usize| -> Result<f64, E> {
            *count += 1;
            let value = objective(x)?;
            if !value.is_finite() {
                return Err(SolverError::NonFiniteObjective { value }.into());
            }
            Ok(value)
        };

        let mut simplex = Vec::with_capacity(dim + 1);
        let mut values = Vec::with_capacity(dim + 1);

        simplex.push(initial.clone());
        values.push(eval(&initial, &mut evaluations)?);

        for d in 0..dim {
            let mut x = initial.clone();
            x[d] = if x[d] != 0.0 {
                x[d] * (1.0 + NONZERO_STEP)
            } else {
                ZERO_STEP
            };
            values.push(eval(&x, &mut evaluations)?);
            simplex.push(x);
        }

        let mut iterations = 0usize;
        let mut converged = false;

        for iter in 0..self.config.max_iterations {
            iterations = iter + 1;

            let mut order: Vec<usize> = (0..simplex.len()).collect();
            order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));
            simplex = order.iter().map(|&i| simplex[i].clone()).collect();
            values = order.iter().map(|&i| values[i]).collect();

            let best = values[0];
            let worst = values[dim];

            // Centroid of all vertices except the worst.
            let centroid: Vec<f64> = (0..dim)
                .map(|d| simplex.iter().take(dim).map(|x| x[d]).sum::<f64>() / dim as f64)
                .collect();

            let max_vertex_dist = simplex
                .iter()
                .map(|x| {
                    x.iter()
                        .zip(&centroid)
                        .map(|(a, b)| (a - b) * (a - b))
                        .sum::<f64>()
                        .sqrt()
                })
                .fold(0.0_f64, f64::max);

            if (worst - best).abs() <= self.config.tolerance
                && max_vertex_dist <= self.config.param_tolerance
            {
                converged = true;
                break;
            }

            // Reflect the worst vertex through the centroid.
            let xr: Vec<f64> = (0..dim)
                .map(|d| centroid[d] + self.config.reflection * (centroid[d] - simplex[dim][d]))
                .collect();
            let fr = eval(&xr, &mut evaluations)?;

            if fr < values[0] {
                let xe: Vec<f64> = (0..dim)
                    .map(|d| centroid[d] + self.config.expansion * (xr[d] - centroid[d]))
                    .collect();
                let fe = eval(&xe, &mut evaluations)?;

                if fe < fr {
                    simplex[dim] = xe;
                    values[dim] = fe;
                } else {
                    simplex[dim] = xr;
                    values[dim] = fr;
                }
                continue;
            }

            if fr < values[dim - 1] {
                simplex[dim] = xr;
                values[dim] = fr;
                continue;
            }

            // Contract towards the centroid.
            let xc: Vec<f64> = (0..dim)
                .map(|d| centroid[d] + self.config.contraction * (simplex[dim][d] - centroid[d]))
                .collect();
            let fc = eval(&xc, &mut evaluations)?;

            if fc < values[dim] {
                simplex[dim] = xc;
                values[dim] = fc;
                continue;
            }

            // Shrink every vertex towards the best.
            for i in 1..=dim {
                for d in 0..dim {
                    simplex[i][d] =
                        simplex[0][d] + self.config.shrink * (simplex[i][d] - simplex[0][d]);
                }
                values[i] = eval(&simplex[i], &mut evaluations)?;
            }
        }

        let mut order: Vec<usize> = (0..simplex.len()).collect();
        order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));
        let best_index = order[0];

        Ok(NelderMeadResult {
            params: simplex.swap_remove(best_index),
            objective: values[best_index],
            iterations,
            evaluations,
            converged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadratic(target: Vec<f64>) -> impl FnMut(&[f64]) -> Result<f64, SolverError> {
        move |p: &[f64]| {
            Ok(p.iter()
                .zip(&target)
                .map(|(x, t)| (x - t) * (x - t))
                .sum())
        }
    }

    // ========================================
    // NelderMeadConfig Tests
    // ========================================

    #[test]
    fn test_config_default() {
        let config = NelderMeadConfig::default();
        assert!((config.tolerance - 1e-8).abs() < 1e-15);
        assert_eq!(config.max_iterations, 2000);
        assert_eq!(config.reflection, 1.0);
    }

    #[test]
    fn test_config_new() {
        let config = NelderMeadConfig::new(1e-6, 100);
        assert!((config.tolerance - 1e-6).abs() < 1e-15);
        assert_eq!(config.max_iterations, 100);
    }

    #[test]
    fn test_config_fast_and_high_precision() {
        assert!(NelderMeadConfig::fast().max_iterations <= 500);
        assert!(NelderMeadConfig::high_precision().tolerance < 1e-10);
    }

    // ========================================
    // Solver Tests
    // ========================================

    #[test]
    fn test_solve_one_dimensional() {
        let solver = NelderMeadSolver::with_defaults();
        let result = solver.solve(quadratic(vec![3.0]), vec![10.0]).unwrap();
        assert!(result.converged);
        assert!((result.params[0] - 3.0).abs() < 1e-4);
        assert!(result.objective < 1e-8);
    }

    #[test]
    fn test_solve_multi_dimensional() {
        let solver = NelderMeadSolver::with_defaults();
        let result = solver
            .solve(quadratic(vec![1.0, -2.0, 0.5]), vec![0.0, 0.0, 0.0])
            .unwrap();
        assert!(result.converged);
        assert!((result.params[0] - 1.0).abs() < 1e-4);
        assert!((result.params[1] + 2.0).abs() < 1e-4);
        assert!((result.params[2] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_solve_rosenbrock() {
        let solver = NelderMeadSolver::new(NelderMeadConfig {
            max_iterations: 5000,
            ..Default::default()
        });
        let rosenbrock = |p: &[f64]| -> Result<f64, SolverError> {
            Ok(100.0 * (p[1] - p[0] * p[0]).powi(2) + (1.0 - p[0]).powi(2))
        };
        let result = solver.solve(rosenbrock, vec![-1.2, 1.0]).unwrap();
        assert!((result.params[0] - 1.0).abs() < 1e-3);
        assert!((result.params[1] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_solve_starting_at_zero() {
        // Zero coordinates take the absolute initial step.
        let solver = NelderMeadSolver::with_defaults();
        let result = solver.solve(quadratic(vec![0.25]), vec![0.0]).unwrap();
        assert!(result.converged);
        assert!((result.params[0] - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_solve_empty_params() {
        let solver = NelderMeadSolver::with_defaults();
        let result = solver.solve(quadratic(vec![]), vec![]);
        assert_eq!(result.unwrap_err(), SolverError::EmptyParameterVector);
    }

    #[test]
    fn test_solve_budget_exhaustion_is_not_an_error() {
        let solver = NelderMeadSolver::new(NelderMeadConfig {
            max_iterations: 3,
            ..Default::default()
        });
        let result = solver.solve(quadratic(vec![100.0]), vec![0.1]).unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
        // Best-effort vertex is still returned.
        assert_eq!(result.params.len(), 1);
    }

    #[test]
    fn test_solve_objective_error_propagates() {
        let solver = NelderMeadSolver::with_defaults();
        let result = solver.solve(
            |p: &[f64]| -> Result<f64, SolverError> {
                if p[0] < 0.0 {
                    Err(SolverError::NumericalInstability(
                        "negative intensity".to_string(),
                    ))
                } else {
                    Ok((p[0] - (-5.0)).powi(2)) // minimum in forbidden region
                }
            },
            vec![0.5],
        );
        assert!(matches!(
            result,
            Err(SolverError::NumericalInstability(_))
        ));
    }

    #[test]
    fn test_solve_non_finite_objective_rejected() {
        let solver = NelderMeadSolver::with_defaults();
        let result = solver.solve(
            |_p: &[f64]| -> Result<f64, SolverError> { Ok(f64::NAN) },
            vec![1.0],
        );
        assert!(matches!(
            result,
            Err(SolverError::NonFiniteObjective { .. })
        ));
    }

    #[test]
    fn test_solve_counts_evaluations() {
        let solver = NelderMeadSolver::with_defaults();
        let result = solver.solve(quadratic(vec![2.0]), vec![1.0]).unwrap();
        // At least the initial simplex (dim + 1) evaluations.
        assert!(result.evaluations >= 2);
        assert!(result.iterations >= 1);
    }

    #[test]
    fn test_solver_clone_and_debug() {
        let solver = NelderMeadSolver::with_defaults();
        let cloned = solver.clone();
        assert_eq!(
            solver.config().max_iterations,
            cloned.config().max_iterations
        );
        assert!(format!("{:?}", solver).contains("NelderMeadSolver"));
    }
}
