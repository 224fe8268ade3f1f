//! Derivative-free optimisation solvers.
//!
//! The calibration engine treats its pricing models as black boxes: no
//! gradient is available or assumed. The only solver here is therefore the
//! [`NelderMeadSolver`] downhill-simplex method.
//!
//! ## Example
//!
//! ```
//! use intensity_core::math::solvers::{NelderMeadConfig, NelderMeadSolver};
//! use intensity_core::types::SolverError;
//!
//! // Minimise (p[0] - 2)^2 + (p[1] - 3)^2
//! let objective = |params: &[f64]| -> Result<f64, SolverError> {
//!     Ok((params[0] - 2.0).powi(2) + (params[1] - 3.0).powi(2))
//! };
//!
//! let solver = NelderMeadSolver::with_defaults();
//! let result = solver.solve(objective, vec![0.0, 0.0]).unwrap();
//!
//! assert!(result.converged);
//! assert!((result.params[0] - 2.0).abs() < 1e-4);
//! assert!((result.params[1] - 3.0).abs() < 1e-4);
//! ```

mod nelder_mead;

pub use nelder_mead::{NelderMeadConfig, NelderMeadResult, NelderMeadSolver};
