//! Cox-Ingersoll-Ross stochastic intensity model.

use intensity_core::market_data::DiscountCurve;
use intensity_core::types::PricingError;

use super::model::{validate_params, IntensityModel};
use super::poisson::{DEFAULT_PERIODS_PER_YEAR, DEFAULT_RECOVERY};
use super::pricing::par_spread_from_survival;

/// Index of each CIR parameter in the calibration vector.
pub struct CirParamIndex;

impl CirParamIndex {
    /// Mean-reversion speed κ.
    pub const KAPPA: usize = 0;
    /// Long-run intensity level θ.
    pub const THETA: usize = 1;
    /// Intensity volatility σ.
    pub const SIGMA: usize = 2;
    /// Initial intensity λ₀.
    pub const LAMBDA0: usize = 3;
    /// Number of CIR parameters.
    pub const COUNT: usize = 4;
}

/// CIR stochastic default-intensity model.
///
/// The intensity follows `dλ = κ(θ − λ)dt + σ√λ dW`, giving the
/// closed-form survival probability of an affine model:
///
/// ```text
/// S(t) = A(t) · exp(−B(t) λ₀),   h = √(κ² + 2σ²)
/// ```
///
/// Volatility must be strictly positive: `σ ≤ 0` makes the variance term
/// meaningless and is rejected as a domain error rather than being left
/// to the objective to penalise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirIntensity {
    recovery: f64,
    periods_per_year: u32,
}

impl Default for CirIntensity {
    fn default() -> Self {
        Self {
            recovery: DEFAULT_RECOVERY,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
        }
    }
}

impl CirIntensity {
    /// Create a model with the default recovery and payment frequency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recovery rate assumption.
    pub fn with_recovery(mut self, recovery: f64) -> Self {
        self.recovery = recovery;
        self
    }

    /// Set the premium payment frequency.
    pub fn with_payment_periods(mut self, periods_per_year: u32) -> Self {
        self.periods_per_year = periods_per_year;
        self
    }

    fn survival(&self, params: &[f64], t: f64) -> Result<f64, PricingError> {
        let kappa = params[CirParamIndex::KAPPA];
        let theta = params[CirParamIndex::THETA];
        let sigma = params[CirParamIndex::SIGMA];
        let lambda0 = params[CirParamIndex::LAMBDA0];

        if sigma <= 0.0 {
            return Err(PricingError::InvalidParameter(format!(
                "CIR volatility must be positive, got {}",
                sigma
            )));
        }

        let h = (kappa * kappa + 2.0 * sigma * sigma).sqrt();
        let e = (h * t).exp();
        let denom = 2.0 * h + (kappa + h) * (e - 1.0);
        if denom == 0.0 || !denom.is_finite() {
            return Err(PricingError::NumericalInstability(format!(
                "CIR survival denominator degenerate at t={}",
                t
            )));
        }

        let b = 2.0 * (e - 1.0) / denom;
        let a = (2.0 * h * ((kappa + h) * t / 2.0).exp() / denom)
            .powf(2.0 * kappa * theta / (sigma * sigma));
        let s = a * (-b * lambda0).exp();

        if !s.is_finite() {
            return Err(PricingError::NumericalInstability(format!(
                "CIR survival is not finite at t={}",
                t
            )));
        }
        Ok(s)
    }
}

impl IntensityModel for CirIntensity {
    fn label(&self) -> &str {
        "CIR"
    }

    fn param_count(&self, _tenor_count: usize) -> usize {
        CirParamIndex::COUNT
    }

    fn default_guess(&self, _tenor_count: usize) -> Vec<f64> {
        vec![0.1, 0.3, 0.2, 0.02]
    }

    fn survival_probability(
        &self,
        params: &[f64],
        t: f64,
        _tenor_grid: &[f64],
    ) -> Result<f64, PricingError> {
        validate_params(self.label(), params, CirParamIndex::COUNT)?;
        self.survival(params, t)
    }

    fn par_spread(
        &self,
        params: &[f64],
        maturity: f64,
        _tenor_grid: &[f64],
        curve: &dyn DiscountCurve<f64>,
    ) -> Result<f64, PricingError> {
        validate_params(self.label(), params, CirParamIndex::COUNT)?;
        par_spread_from_survival(
            |t| self.survival(params, t),
            maturity,
            curve,
            self.recovery,
            self.periods_per_year,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use intensity_core::market_data::FlatCurve;

    const GRID: [f64; 3] = [1.0, 3.0, 5.0];
    const PARAMS: [f64; 4] = [0.1, 0.3, 0.2, 0.02];

    #[test]
    fn test_survival_at_zero_is_one() {
        let model = CirIntensity::new();
        let s = model.survival_probability(&PARAMS, 0.0, &GRID).unwrap();
        assert_relative_eq!(s, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_survival_monotone_decreasing() {
        let model = CirIntensity::new();
        let mut prev = 1.0;
        for t in [1.0, 2.0, 5.0, 10.0, 20.0] {
            let s = model.survival_probability(&PARAMS, t, &GRID).unwrap();
            assert!(s < prev, "S({}) = {} not below {}", t, s, prev);
            assert!(s > 0.0);
            prev = s;
        }
    }

    #[test]
    fn test_non_positive_volatility_rejected() {
        let model = CirIntensity::new();
        for sigma in [0.0, -0.2] {
            let err = model
                .survival_probability(&[0.1, 0.3, sigma, 0.02], 1.0, &GRID)
                .unwrap_err();
            assert!(matches!(err, PricingError::InvalidParameter(_)));
        }
    }

    #[test]
    fn test_wrong_param_count_rejected() {
        let model = CirIntensity::new();
        let err = model
            .survival_probability(&[0.1, 0.3, 0.2], 1.0, &GRID)
            .unwrap_err();
        assert!(err.to_string().contains("expects 4"));
    }

    #[test]
    fn test_higher_initial_intensity_lower_survival() {
        let model = CirIntensity::new();
        let low = model
            .survival_probability(&[0.1, 0.3, 0.2, 0.01], 5.0, &GRID)
            .unwrap();
        let high = model
            .survival_probability(&[0.1, 0.3, 0.2, 0.10], 5.0, &GRID)
            .unwrap();
        assert!(high < low);
    }

    #[test]
    fn test_par_spread_positive() {
        let model = CirIntensity::new();
        let curve = FlatCurve::new(0.02);
        let spread = model.par_spread(&PARAMS, 5.0, &GRID, &curve).unwrap();
        assert!(spread > 0.0);
        assert!(spread.is_finite());
    }

    #[test]
    fn test_default_guess_dimension() {
        let model = CirIntensity::new();
        assert_eq!(model.default_guess(7).len(), CirParamIndex::COUNT);
        assert_eq!(model.param_count(7), 4);
    }
}
