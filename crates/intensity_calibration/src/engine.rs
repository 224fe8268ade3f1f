//! Calibration state machine.
//!
//! The lifecycle is explicit: a [`CalibrationBuilder`] collects inputs
//! (uninitialised), [`CalibrationBuilder::build`] validates them into a
//! [`Calibration`] (configured), and [`Calibration::calibrate`] produces
//! the fitted vector (calibrated). Fit-dependent queries before
//! `calibrate()` fail with a state error instead of fitting implicitly,
//! and nothing ever recalibrates behind the caller's back.

use std::fmt;
use std::sync::Arc;

use intensity_core::market_data::{DiscountCurve, MarketDataSet};
use intensity_core::math::solvers::{NelderMeadConfig, NelderMeadSolver};
use intensity_core::traits::calibration::{CalibrationConfig, CalibrationResult};
use intensity_core::types::{CalibrationError, PricingError};
use intensity_models::credit::IntensityModel;

use crate::objective::sum_squared_spread_error;
use crate::report::{CalibrationReport, ReportRow};

/// Shared read-only discount curve handle.
pub type SharedCurve = Arc<dyn DiscountCurve<f64> + Send + Sync>;

/// Shared read-only model handle.
pub type SharedModel = Arc<dyn IntensityModel>;

/// Builder collecting the inputs of a calibration.
///
/// `build()` fails with [`CalibrationErrorKind::MissingInput`] until a
/// model, market data, and a discount curve are all bound, and with
/// [`CalibrationErrorKind::DimensionMismatch`] when an explicit guess
/// disagrees with the model's declared parameter count for the bound
/// tenor grid.
///
/// [`CalibrationErrorKind::MissingInput`]: intensity_core::types::CalibrationErrorKind::MissingInput
/// [`CalibrationErrorKind::DimensionMismatch`]: intensity_core::types::CalibrationErrorKind::DimensionMismatch
#[derive(Default)]
pub struct CalibrationBuilder {
    model: Option<SharedModel>,
    market_data: Option<Arc<MarketDataSet>>,
    curve: Option<SharedCurve>,
    guess: Option<Vec<f64>>,
    config: CalibrationConfig,
}

impl CalibrationBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the intensity model to calibrate.
    pub fn with_model<M: IntensityModel + 'static>(mut self, model: M) -> Self {
        self.model = Some(Arc::new(model));
        self
    }

    /// Bind an already-shared model handle (for batch setups reusing one
    /// model value across calibrations).
    pub fn with_shared_model(mut self, model: SharedModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Bind the market observations to fit against.
    pub fn with_market_data(mut self, data: MarketDataSet) -> Self {
        self.market_data = Some(Arc::new(data));
        self
    }

    /// Bind the discount curve.
    pub fn with_curve<C>(mut self, curve: C) -> Self
    where
        C: DiscountCurve<f64> + Send + Sync + 'static,
    {
        self.curve = Some(Arc::new(curve));
        self
    }

    /// Bind an already-shared curve handle.
    pub fn with_shared_curve(mut self, curve: SharedCurve) -> Self {
        self.curve = Some(curve);
        self
    }

    /// Override the model's default initial guess.
    pub fn with_guess(mut self, guess: Vec<f64>) -> Self {
        self.guess = Some(guess);
        self
    }

    /// Override the default calibration configuration.
    pub fn with_config(mut self, config: CalibrationConfig) -> Self {
        self.config = config;
        self
    }

    /// Finalise the builder into a configured [`Calibration`].
    ///
    /// # Errors
    ///
    /// - `MissingInput` if model, market data, or curve was never bound
    /// - `DimensionMismatch` if an explicit guess has the wrong length
    ///   for the bound model and tenor grid
    pub fn build(self) -> Result<Calibration, CalibrationError> {
        let model = self.model.ok_or_else(|| CalibrationError::missing_input("model"))?;
        let market_data = self
            .market_data
            .ok_or_else(|| CalibrationError::missing_input("market data"))?;
        let curve = self
            .curve
            .ok_or_else(|| CalibrationError::missing_input("discount curve"))?;

        let expected = model.param_count(market_data.len());
        let guess = match self.guess {
            Some(guess) => {
                if guess.len() != expected {
                    return Err(CalibrationError::dimension_mismatch(expected, guess.len())
                        .with_parameters(guess));
                }
                guess
            }
            None => model.default_guess(market_data.len()),
        };

        Ok(Calibration {
            model,
            market_data,
            curve,
            guess,
            config: self.config,
            fit: None,
        })
    }
}

/// A configured calibration: one model, one quote set, one curve.
///
/// Model, market data, and curve are read-only shared inputs; the
/// calibration owns its guess and, once fitted, the calibrated vector.
/// Re-calibration is explicit: only [`calibrate`](Calibration::calibrate)
/// changes the fitted state, and it always restarts from the original
/// guess.
pub struct Calibration {
    model: SharedModel,
    market_data: Arc<MarketDataSet>,
    curve: SharedCurve,
    guess: Vec<f64>,
    config: CalibrationConfig,
    fit: Option<CalibrationResult<Vec<f64>>>,
}

impl fmt::Debug for Calibration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Calibration")
            .field("model", &self.model.label())
            .field("market_data", &self.market_data)
            .field("guess", &self.guess)
            .field("config", &self.config)
            .field("fit", &self.fit)
            .finish_non_exhaustive()
    }
}

// Objective value assigned to candidate vectors the model is undefined
// at. Large but finite, so the simplex backs out of the region instead
// of the whole fit aborting.
const OUT_OF_DOMAIN_PENALTY: f64 = 1e12;

impl Calibration {
    /// Fit the model to the market spreads.
    ///
    /// Runs the Nelder-Mead solver on the sum-of-squared spread errors
    /// from the bound guess. The dimensionality check is repeated here:
    /// [`replace_market_data`](Calibration::replace_market_data) can
    /// legitimately change the grid after binding, at which point an
    /// inhomogeneous guess no longer matches.
    ///
    /// Non-convergence is not an error: the best-effort vector is stored
    /// and returned with `converged == false` and a message. Calling
    /// again re-fits from the original guess and overwrites the stored
    /// vector.
    ///
    /// An unconstrained simplex will wander outside a model's domain
    /// (negative CIR volatility, say). Such candidates are penalised
    /// with a large finite objective rather than aborting the fit; the
    /// hard invalid-parameter error is reserved for report-time pricing
    /// of the fitted vector.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the guess no longer matches the grid
    /// - `NumericalInstability` if a candidate produced non-finite legs
    ///   the objective could not evaluate
    pub fn calibrate(&mut self) -> Result<CalibrationResult<Vec<f64>>, CalibrationError> {
        let expected = self.model.param_count(self.market_data.len());
        if self.guess.len() != expected {
            return Err(CalibrationError::dimension_mismatch(expected, self.guess.len())
                .with_parameters(self.guess.clone()));
        }

        let solver = NelderMeadSolver::new(NelderMeadConfig {
            tolerance: self.config.tolerance,
            param_tolerance: self.config.param_tolerance,
            max_iterations: self.config.max_iterations,
            ..NelderMeadConfig::default()
        });

        let model = &self.model;
        let curve = &self.curve;
        let data = &self.market_data;
        let solved = solver.solve(
            |params: &[f64]| -> Result<f64, CalibrationError> {
                match sum_squared_spread_error(model.as_ref(), curve.as_ref(), data, params) {
                    Ok(value) => Ok(value),
                    Err(PricingError::InvalidParameter(_)) => Ok(OUT_OF_DOMAIN_PENALTY),
                    Err(err) => Err(CalibrationError::from(err)),
                }
            },
            self.guess.clone(),
        )?;

        let result = if solved.converged {
            CalibrationResult::converged(solved.params, solved.iterations, solved.objective)
        } else {
            CalibrationResult::not_converged(
                solved.params,
                solved.iterations,
                solved.objective,
                format!(
                    "iteration budget ({}) exhausted before tolerance {:e}; best-effort parameters retained",
                    self.config.max_iterations, self.config.tolerance
                ),
            )
        };
        self.fit = Some(result.clone());
        Ok(result)
    }

    /// Replace the bound market data, discarding any fitted state.
    ///
    /// The guess is left untouched, so after swapping in a grid of a
    /// different size an inhomogeneous calibration fails its next
    /// `calibrate()` with a dimension mismatch instead of silently
    /// refitting a stale vector.
    pub fn replace_market_data(&mut self, data: MarketDataSet) {
        self.market_data = Arc::new(data);
        self.fit = None;
    }

    /// The fitted parameter vector, if `calibrate()` has run.
    pub fn calibrated_gamma(&self) -> Option<&[f64]> {
        self.fit.as_ref().map(|fit| fit.params.as_slice())
    }

    /// Whether a fitted vector exists.
    pub fn is_calibrated(&self) -> bool {
        self.fit.is_some()
    }

    /// The bound model.
    pub fn model(&self) -> &dyn IntensityModel {
        self.model.as_ref()
    }

    /// The bound market observations.
    pub fn market_data(&self) -> &MarketDataSet {
        &self.market_data
    }

    /// The calibration configuration.
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// The initial guess the optimiser starts from.
    pub fn guess(&self) -> &[f64] {
        &self.guess
    }

    fn fitted(&self) -> Result<&CalibrationResult<Vec<f64>>, CalibrationError> {
        self.fit.as_ref().ok_or_else(CalibrationError::not_calibrated)
    }

    /// Root-mean-square spread error of the fitted parameters.
    ///
    /// Recomputed fresh as `sqrt(objective(gamma) / N)` with N the tenor
    /// count. For the inhomogeneous variant N also equals the parameter
    /// count; the divisor is still N, matching the engine's single RMSE
    /// convention across variants.
    ///
    /// # Errors
    ///
    /// `NotCalibrated` before a successful `calibrate()`.
    pub fn rmse(&self) -> Result<f64, CalibrationError> {
        let fit = self.fitted()?;
        let sum = sum_squared_spread_error(
            self.model.as_ref(),
            self.curve.as_ref(),
            &self.market_data,
            &fit.params,
        )?;
        Ok((sum / self.market_data.len() as f64).sqrt())
    }

    /// Build the goodness-of-fit report for the fitted parameters.
    ///
    /// The report is an immutable value recomputed fresh on each call;
    /// it never triggers recalibration. Repeated calls without an
    /// intervening `calibrate()` return identical reports.
    ///
    /// # Errors
    ///
    /// `NotCalibrated` before a successful `calibrate()`.
    pub fn report(&self) -> Result<CalibrationReport, CalibrationError> {
        let fit = self.fitted()?;
        let grid = self.market_data.tenors();

        let mut rows = Vec::with_capacity(grid.len());
        for (index, quote) in self.market_data.observations().iter().enumerate() {
            let model_spread =
                self.model
                    .par_spread(&fit.params, quote.tenor, &grid, self.curve.as_ref())?;
            let survival = self
                .model
                .survival_probability(&fit.params, quote.tenor, &grid)?;
            rows.push(ReportRow {
                tenor: quote.tenor,
                market_spread: quote.spread,
                model_spread,
                survival_probability_pct: survival * 100.0,
                intensity: self.model.bucket_intensity(&fit.params, index),
            });
        }

        Ok(CalibrationReport {
            model: self.model.label().to_string(),
            valuation_date: self.market_data.valuation_date(),
            converged: fit.converged,
            iterations: fit.iterations,
            rmse: self.rmse()?,
            rows,
        })
    }

    /// Render each fitted parameter as an indexed lambda cell for
    /// typeset tables, e.g. `$\lambda_0 = 0.0123$, $\lambda_1 = 0.0187$`.
    ///
    /// # Errors
    ///
    /// `NotCalibrated` before a successful `calibrate()`.
    pub fn parameter_summary(&self) -> Result<String, CalibrationError> {
        let fit = self.fitted()?;
        Ok(fit
            .params
            .iter()
            .enumerate()
            .map(|(i, value)| format!("$\\lambda_{} = {:.4}$", i, value))
            .collect::<Vec<_>>()
            .join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use intensity_core::market_data::{FlatCurve, SpreadQuote};
    use intensity_core::types::CalibrationErrorKind;
    use intensity_models::credit::{CirIntensity, HomogeneousPoisson, InhomogeneousPoisson};

    fn market_data() -> MarketDataSet {
        MarketDataSet::new(
            NaiveDate::from_ymd_opt(2007, 12, 31).unwrap(),
            vec![
                SpreadQuote::new(1.0, 100.0),
                SpreadQuote::new(3.0, 120.0),
                SpreadQuote::new(5.0, 140.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_build_requires_all_inputs() {
        let err = CalibrationBuilder::new().build().unwrap_err();
        assert!(matches!(
            err.kind,
            CalibrationErrorKind::MissingInput(ref input) if input == "model"
        ));

        let err = CalibrationBuilder::new()
            .with_model(HomogeneousPoisson::new())
            .build()
            .unwrap_err();
        assert!(matches!(
            err.kind,
            CalibrationErrorKind::MissingInput(ref input) if input == "market data"
        ));

        let err = CalibrationBuilder::new()
            .with_model(HomogeneousPoisson::new())
            .with_market_data(market_data())
            .build()
            .unwrap_err();
        assert!(matches!(
            err.kind,
            CalibrationErrorKind::MissingInput(ref input) if input == "discount curve"
        ));
    }

    #[test]
    fn test_build_uses_model_default_guess() {
        let calibration = CalibrationBuilder::new()
            .with_model(InhomogeneousPoisson::new())
            .with_market_data(market_data())
            .with_curve(FlatCurve::new(0.0))
            .build()
            .unwrap();
        assert_eq!(calibration.guess(), &[0.01, 0.01, 0.01]);
    }

    #[test]
    fn test_build_rejects_wrong_guess_length() {
        let err = CalibrationBuilder::new()
            .with_model(InhomogeneousPoisson::new())
            .with_market_data(market_data())
            .with_curve(FlatCurve::new(0.0))
            .with_guess(vec![0.01])
            .build()
            .unwrap_err();
        assert!(matches!(
            err.kind,
            CalibrationErrorKind::DimensionMismatch { expected: 3, got: 1 }
        ));
        assert_eq!(err.parameter_values, Some(vec![0.01]));
    }

    #[test]
    fn test_queries_before_calibrate_are_state_errors() {
        let calibration = CalibrationBuilder::new()
            .with_model(HomogeneousPoisson::new())
            .with_market_data(market_data())
            .with_curve(FlatCurve::new(0.0))
            .build()
            .unwrap();
        assert!(!calibration.is_calibrated());
        assert!(calibration.rmse().unwrap_err().is_state_error());
        assert!(calibration.report().unwrap_err().is_state_error());
        assert!(calibration.parameter_summary().unwrap_err().is_state_error());
        assert!(calibration.calibrated_gamma().is_none());
    }

    #[test]
    fn test_calibrate_stores_fitted_vector() {
        let mut calibration = CalibrationBuilder::new()
            .with_model(HomogeneousPoisson::new())
            .with_market_data(market_data())
            .with_curve(FlatCurve::new(0.0))
            .build()
            .unwrap();
        let result = calibration.calibrate().unwrap();
        assert!(calibration.is_calibrated());
        assert_eq!(
            calibration.calibrated_gamma().unwrap(),
            result.params.as_slice()
        );
    }

    #[test]
    fn test_non_convergence_keeps_best_effort_vector() {
        let mut calibration = CalibrationBuilder::new()
            .with_model(HomogeneousPoisson::new())
            .with_market_data(market_data())
            .with_curve(FlatCurve::new(0.0))
            .with_config(CalibrationConfig::new(1e-16, 2))
            .build()
            .unwrap();
        let result = calibration.calibrate().unwrap();
        assert!(!result.converged);
        assert!(result.message.is_some());
        assert!(calibration.is_calibrated());
        // Queries still work on the best-effort vector.
        assert!(calibration.rmse().unwrap().is_finite());
        assert!(!calibration.report().unwrap().converged);
    }

    #[test]
    fn test_replace_market_data_resets_fit() {
        let mut calibration = CalibrationBuilder::new()
            .with_model(HomogeneousPoisson::new())
            .with_market_data(market_data())
            .with_curve(FlatCurve::new(0.0))
            .build()
            .unwrap();
        calibration.calibrate().unwrap();
        assert!(calibration.is_calibrated());

        calibration.replace_market_data(
            MarketDataSet::new(
                NaiveDate::from_ymd_opt(2008, 3, 31).unwrap(),
                vec![SpreadQuote::new(5.0, 260.0)],
            )
            .unwrap(),
        );
        assert!(!calibration.is_calibrated());
        assert!(calibration.rmse().unwrap_err().is_state_error());
    }

    #[test]
    fn test_replaced_grid_size_fails_dimension_check() {
        let mut calibration = CalibrationBuilder::new()
            .with_model(InhomogeneousPoisson::new())
            .with_market_data(market_data())
            .with_curve(FlatCurve::new(0.0))
            .build()
            .unwrap();
        calibration.replace_market_data(
            MarketDataSet::new(
                NaiveDate::from_ymd_opt(2008, 3, 31).unwrap(),
                vec![SpreadQuote::new(1.0, 110.0), SpreadQuote::new(5.0, 150.0)],
            )
            .unwrap(),
        );
        let err = calibration.calibrate().unwrap_err();
        assert!(err.is_dimension_mismatch());
    }

    #[test]
    fn test_debug_does_not_require_calibration() {
        let calibration = CalibrationBuilder::new()
            .with_model(HomogeneousPoisson::new())
            .with_market_data(market_data())
            .with_curve(FlatCurve::new(0.0))
            .build()
            .unwrap();
        let debug = format!("{:?}", calibration);
        assert!(debug.contains("Calibration"));
        assert!(debug.contains("HP"));
        assert!(debug.contains("fit: None"));
    }

    #[test]
    fn test_cir_fit_survives_out_of_domain_candidates() {
        // The unconstrained simplex proposes negative volatilities along
        // the way; those candidates are penalised, not fatal, and the
        // fitted vector stays inside the model's domain.
        let mut calibration = CalibrationBuilder::new()
            .with_model(CirIntensity::new())
            .with_market_data(market_data())
            .with_curve(FlatCurve::new(0.0))
            .build()
            .unwrap();
        let result = calibration.calibrate().unwrap();
        assert!(result.residual_ss.is_finite());
        assert!(result.params[2] > 0.0, "fitted sigma {} not positive", result.params[2]);
        assert!(calibration.rmse().unwrap().is_finite());
        assert_eq!(calibration.report().unwrap().model, "CIR");
    }

    #[test]
    fn test_parameter_summary_format() {
        let mut calibration = CalibrationBuilder::new()
            .with_model(InhomogeneousPoisson::new())
            .with_market_data(market_data())
            .with_curve(FlatCurve::new(0.0))
            .build()
            .unwrap();
        calibration.calibrate().unwrap();
        let summary = calibration.parameter_summary().unwrap();
        assert!(summary.starts_with("$\\lambda_0 = "));
        assert!(summary.contains("$\\lambda_1 = "));
        assert!(summary.contains("$\\lambda_2 = "));
        assert_eq!(summary.matches('$').count(), 6);
    }
}
