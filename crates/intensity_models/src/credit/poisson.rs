//! Poisson default-intensity models.
//!
//! The homogeneous variant carries one intensity for every maturity; the
//! inhomogeneous variant carries one intensity per tenor bucket and steps
//! across the sorted grid, so the survival probability to any time depends
//! on the whole term structure up to it.

use intensity_core::market_data::DiscountCurve;
use intensity_core::types::PricingError;

use super::model::{validate_params, IntensityModel};
use super::pricing::par_spread_from_survival;

/// Default recovery rate assumption.
pub const DEFAULT_RECOVERY: f64 = 0.4;

/// Default premium payment frequency (quarterly).
pub const DEFAULT_PERIODS_PER_YEAR: u32 = 4;

/// Homogeneous Poisson intensity model.
///
/// A single constant intensity `λ` drives defaults at every horizon:
/// `S(t) = exp(−λ t)`. Calibration fits that one scalar to the whole
/// spread curve, so it cannot reproduce term-structure shape, only level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomogeneousPoisson {
    recovery: f64,
    periods_per_year: u32,
}

impl Default for HomogeneousPoisson {
    fn default() -> Self {
        Self {
            recovery: DEFAULT_RECOVERY,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
        }
    }
}

impl HomogeneousPoisson {
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
}

impl IntensityModel for HomogeneousPoisson {
    fn label(&self) -> &str {
        "HP"
    }

    fn param_count(&self, _tenor_count: usize) -> usize {
        1
    }

    fn default_guess(&self, _tenor_count: usize) -> Vec<f64> {
        vec![0.01]
    }

    fn survival_probability(
        &self,
        params: &[f64],
        t: f64,
        _tenor_grid: &[f64],
    ) -> Result<f64, PricingError> {
        validate_params(self.label(), params, 1)?;
        Ok((-params[0] * t).exp())
    }

    fn par_spread(
        &self,
        params: &[f64],
        maturity: f64,
        tenor_grid: &[f64],
        curve: &dyn DiscountCurve<f64>,
    ) -> Result<f64, PricingError> {
        validate_params(self.label(), params, 1)?;
        par_spread_from_survival(
            |t| self.survival_probability(params, t, tenor_grid),
            maturity,
            curve,
            self.recovery,
            self.periods_per_year,
        )
    }
}

/// Inhomogeneous Poisson intensity model.
///
/// The intensity is piecewise constant over the sorted tenor grid: bucket
/// `i` spans `(tenor[i-1], tenor[i]]` (the first bucket starts at zero)
/// and carries its own `λᵢ`. The cumulative hazard to time `t` integrates
/// the step function, so survival to any maturity depends on every bucket
/// before it. Beyond the last tenor the final intensity is extrapolated
/// flat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InhomogeneousPoisson {
    recovery: f64,
    periods_per_year: u32,
}

impl Default for InhomogeneousPoisson {
    fn default() -> Self {
        Self {
            recovery: DEFAULT_RECOVERY,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
        }
    }
}

impl InhomogeneousPoisson {
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

    /// Cumulative hazard `∫₀ᵗ λ(u) du` over the piecewise-constant grid.
    fn cumulative_hazard(&self, params: &[f64], t: f64, tenor_grid: &[f64]) -> f64 {
        let mut hazard = 0.0;
        let mut bucket_start = 0.0;
        for (i, &bucket_end) in tenor_grid.iter().enumerate() {
            if t <= bucket_start {
                break;
            }
            hazard += params[i] * (bucket_end.min(t) - bucket_start);
            bucket_start = bucket_end;
        }
        if t > bucket_start {
            // Flat extrapolation past the last tenor.
            hazard += params[params.len() - 1] * (t - bucket_start);
        }
        hazard
    }
}

impl IntensityModel for InhomogeneousPoisson {
    fn label(&self) -> &str {
        "IHP"
    }

    fn param_count(&self, tenor_count: usize) -> usize {
        tenor_count
    }

    fn default_guess(&self, tenor_count: usize) -> Vec<f64> {
        vec![0.01; tenor_count]
    }

    fn survival_probability(
        &self,
        params: &[f64],
        t: f64,
        tenor_grid: &[f64],
    ) -> Result<f64, PricingError> {
        validate_params(self.label(), params, tenor_grid.len())?;
        if tenor_grid.is_empty() {
            return Err(PricingError::InvalidParameter(
                "IHP requires a non-empty tenor grid".to_string(),
            ));
        }
        Ok((-self.cumulative_hazard(params, t, tenor_grid)).exp())
    }

    fn par_spread(
        &self,
        params: &[f64],
        maturity: f64,
        tenor_grid: &[f64],
        curve: &dyn DiscountCurve<f64>,
    ) -> Result<f64, PricingError> {
        validate_params(self.label(), params, tenor_grid.len())?;
        par_spread_from_survival(
            |t| self.survival_probability(params, t, tenor_grid),
            maturity,
            curve,
            self.recovery,
            self.periods_per_year,
        )
    }

    fn bucket_intensity(&self, params: &[f64], index: usize) -> Option<f64> {
        params.get(index).copied()
    }
}
