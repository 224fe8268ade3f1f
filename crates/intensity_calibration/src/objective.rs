//! The calibration objective.
//!
//! One code path serves every model variant: the homogeneous and
//! inhomogeneous structural difference lives in how the model consumes
//! the tenor grid, not in the objective.

use intensity_core::market_data::{DiscountCurve, MarketDataSet};
use intensity_core::types::PricingError;
use intensity_models::credit::IntensityModel;

/// Sum of squared differences between model and market par spreads.
///
/// For every observation `(tenor, market_spread)` in `data`, the model
/// par spread is evaluated at that maturity with the full sorted tenor
/// grid, and `(model − market)²` is accumulated. The result is a scalar
/// sum, never averaged.
///
/// Domain errors from the model propagate; a candidate vector the model
/// cannot price aborts the evaluation rather than contributing a
/// sentinel value.
pub fn sum_squared_spread_error(
    model: &dyn IntensityModel,
    curve: &dyn DiscountCurve<f64>,
    data: &MarketDataSet,
    params: &[f64],
) -> Result<f64, PricingError> {
    let grid = data.tenors();
    let mut sum = 0.0;
    for quote in data.observations() {
        let model_spread = model.par_spread(params, quote.tenor, &grid, curve)?;
        let diff = model_spread - quote.spread;
        sum += diff * diff;
    }
    Ok(sum)
}
