//! Discount curve trait and flat implementation.

use super::error::MarketDataError;
use num_traits::Float;

/// Generic discount curve for present-value calculations.
///
/// Implementations are generic over `T: Float` so the same curve can be
/// used with `f64` or `f32`; the calibration engine consumes curves as
/// `dyn DiscountCurve<f64>`.
///
/// # Contract
///
/// - `discount_factor(t)` returns the discount factor D(t) for maturity t
///
/// # Invariants
///
/// - D(0) = 1
/// - D(t) in (0, 1] for all t >= 0 under non-negative rates
/// - D(t1) >= D(t2) for t1 <= t2 (no arbitrage condition)
///
/// # Example
///
/// ```
/// use intensity_core::market_data::curves::{DiscountCurve, FlatCurve};
///
/// let curve = FlatCurve::new(0.05_f64);
/// let df = curve.discount_factor(1.0).unwrap();
/// assert!((df - 0.951229).abs() < 1e-5);
/// ```
pub trait DiscountCurve<T: Float> {
    /// Return the discount factor for maturity `t`.
    ///
    /// # Arguments
    ///
    /// * `t` - Time to maturity in years (must be >= 0)
    ///
    /// # Returns
    ///
    /// * `Ok(D(t))` - Discount factor at time t
    /// * `Err(MarketDataError::InvalidMaturity)` - If t < 0
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError>;

    /// Return the continuously compounded zero rate for maturity `t`.
    ///
    /// # Default Implementation
    ///
    /// ```text
    /// r(t) = -ln(D(t)) / t
    /// ```
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        let df = self.discount_factor(t)?;
        if t <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok(-df.ln() / t)
    }
}

/// Flat discount curve with a constant continuously compounded rate.
///
/// The original calibration drivers price every CDS off a flat curve
/// (often at rate zero, which makes every discount factor 1); this is the
/// direct counterpart.
///
/// # Example
///
/// ```
/// use intensity_core::market_data::curves::{DiscountCurve, FlatCurve};
///
/// let curve = FlatCurve::new(0.0_f64);
/// assert_eq!(curve.discount_factor(7.5).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatCurve<T: Float> {
    rate: T,
}

impl<T: Float> FlatCurve<T> {
    /// Construct a flat curve with the given constant rate.
    #[inline]
    pub fn new(rate: T) -> Self {
        Self { rate }
    }

    /// Return the constant rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }
}

impl<T: Float> DiscountCurve<T> for FlatCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok((-self.rate * t).exp())
    }

    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok(self.rate)
    }
}
