//! The intensity-model capability trait.

use intensity_core::market_data::DiscountCurve;
use intensity_core::types::PricingError;

/// A default-intensity model that can price par CDS spreads.
///
/// Implementations are small capability objects: the calibration engine
/// and the batch driver hold them as `Arc<dyn IntensityModel>` and never
/// depend on the concrete variant.
///
/// A model declares its parameter dimensionality through
/// [`param_count`](IntensityModel::param_count); the engine validates the
/// initial guess against it when the model is bound, so a wrong-length
/// vector is rejected before any optimiser step runs.
///
/// Pricing methods take the parameter vector explicitly rather than
/// storing fitted state: the same model value prices every candidate the
/// optimiser proposes, and the engine owns the fitted vector.
pub trait IntensityModel: Send + Sync {
    /// Short label for reports and diagnostics ("HP", "IHP", "CIR").
    fn label(&self) -> &str;

    /// Number of parameters the model requires for a grid of
    /// `tenor_count` maturities.
    fn param_count(&self, tenor_count: usize) -> usize;

    /// Conventional starting vector for a grid of `tenor_count` maturities.
    fn default_guess(&self, tenor_count: usize) -> Vec<f64>;

    /// Survival probability to time `t` under `params`.
    ///
    /// `tenor_grid` is the full sorted maturity grid of the quote set;
    /// term-structure models consume it, flat models ignore it.
    fn survival_probability(
        &self,
        params: &[f64],
        t: f64,
        tenor_grid: &[f64],
    ) -> Result<f64, PricingError>;

    /// Par CDS spread in basis points for a contract maturing at
    /// `maturity`, discounting on `curve`.
    fn par_spread(
        &self,
        params: &[f64],
        maturity: f64,
        tenor_grid: &[f64],
        curve: &dyn DiscountCurve<f64>,
    ) -> Result<f64, PricingError>;

    /// Piecewise-constant intensity for tenor bucket `index`, when the
    /// model has one. Flat and stochastic models return `None`.
    fn bucket_intensity(&self, _params: &[f64], _index: usize) -> Option<f64> {
        None
    }
}

/// Reject a parameter vector whose length does not match the model's
/// declared count, or that carries non-finite entries.
pub(crate) fn validate_params(
    label: &str,
    params: &[f64],
    expected: usize,
) -> Result<(), PricingError> {
    if params.len() != expected {
        return Err(PricingError::InvalidParameter(format!(
            "{} expects {} parameter(s), got {}",
            label,
            expected,
            params.len()
        )));
    }
    if let Some(p) = params.iter().find(|p| !p.is_finite()) {
        return Err(PricingError::InvalidParameter(format!(
            "{} parameter is not finite: {}",
            label, p
        )));
    }
    Ok(())
}
