//! Par-spread pricing from a survival curve.
//!
//! The leg decomposition is shared by every intensity model: a model only
//! supplies its survival function, and the par spread falls out of the
//! premium and protection legs evaluated on the payment grid.

use intensity_core::market_data::DiscountCurve;
use intensity_core::types::PricingError;

use super::schedule::payment_times;

/// Basis points per unit of spread.
const BASIS_POINTS: f64 = 10_000.0;

/// Par CDS spread in basis points from an arbitrary survival function.
///
/// Both legs are evaluated on the same payment grid:
///
/// - premium leg: `Σ Δᵢ · D(tᵢ) · S(tᵢ)` (premium accrues only while the
///   reference entity survives)
/// - protection leg: `Σ D(tᵢ) · (S(tᵢ₋₁) − S(tᵢ))` (default within a
///   period pays `1 − recovery` at the period end)
///
/// and the par spread is the coupon equating them:
/// `10000 · (1 − recovery) · protection / premium`.
///
/// Fails with [`PricingError::NumericalInstability`] when the premium leg
/// is non-positive (the spread would be meaningless) or when either leg
/// evaluates to a non-finite value, and with
/// [`PricingError::InvalidParameter`] for a non-positive maturity.
pub fn par_spread_from_survival<S>(
    survival: S,
    maturity: f64,
    curve: &dyn DiscountCurve<f64>,
    recovery: f64,
    periods_per_year: u32,
) -> Result<f64, PricingError>
where
    S: Fn(f64) -> Result<f64, PricingError>,
{
    let times = payment_times(maturity, periods_per_year);
    if times.is_empty() {
        return Err(PricingError::InvalidParameter(format!(
            "maturity must be positive, got {}",
            maturity
        )));
    }

    let mut premium = 0.0;
    let mut protection = 0.0;
    let mut prev_time = 0.0;
    let mut prev_survival = 1.0;

    for &t in &times {
        let df = curve
            .discount_factor(t)
            .map_err(|e| PricingError::NumericalInstability(e.to_string()))?;
        let s = survival(t)?;
        premium += (t - prev_time) * df * s;
        protection += df * (prev_survival - s);
        prev_time = t;
        prev_survival = s;
    }

    if !premium.is_finite() || !protection.is_finite() {
        return Err(PricingError::NumericalInstability(format!(
            "leg values are not finite: premium={}, protection={}",
            premium, protection
        )));
    }
    if premium <= 0.0 {
        return Err(PricingError::NumericalInstability(format!(
            "premium leg is non-positive ({:.6e}); spread is undefined",
            premium
        )));
    }

    Ok(BASIS_POINTS * (1.0 - recovery) * protection / premium)
}
