//! Parallel calibration of independent model families.
//!
//! A batch is embarrassingly parallel: each calibration owns its guess
//! and fitted state, and shares only read-only `Arc` handles (model,
//! curve, market data) with its siblings. No locking is needed.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use intensity_core::traits::calibration::CalibrationResult;
use intensity_core::types::CalibrationError;

use crate::engine::Calibration;

/// Outcome of one batch entry: the calibration (carrying any fitted
/// state) together with its result.
pub type BatchOutcome = (
    Calibration,
    Result<CalibrationResult<Vec<f64>>, CalibrationError>,
);

/// Calibrate every entry, one worker per calibration.
///
/// Outcomes are returned in input order. A hard failure in one entry
/// (a dimension mismatch after a grid swap, say) does not disturb the
/// others; it simply becomes that entry's `Err`. Non-convergence is not
/// a failure here either: it arrives as `Ok` with `converged == false`.
///
/// With the `parallel` feature disabled the batch runs sequentially
/// with identical semantics.
pub fn calibrate_batch(calibrations: Vec<Calibration>) -> Vec<BatchOutcome> {
    #[cfg(feature = "parallel")]
    {
        calibrations
            .into_par_iter()
            .map(|mut calibration| {
                let result = calibration.calibrate();
                (calibration, result)
            })
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        calibrations
            .into_iter()
            .map(|mut calibration| {
                let result = calibration.calibrate();
                (calibration, result)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use intensity_core::market_data::{FlatCurve, MarketDataSet, SpreadQuote};
    use intensity_models::credit::{CirIntensity, HomogeneousPoisson, InhomogeneousPoisson};

    use crate::engine::CalibrationBuilder;

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
    fn test_batch_calibrates_every_family() {
        let outcomes = calibrate_batch(vec![
            CalibrationBuilder::new()
                .with_model(HomogeneousPoisson::new())
                .with_market_data(market_data())
                .with_curve(FlatCurve::new(0.0))
                .build()
                .unwrap(),
            CalibrationBuilder::new()
                .with_model(InhomogeneousPoisson::new())
                .with_market_data(market_data())
                .with_curve(FlatCurve::new(0.0))
                .build()
                .unwrap(),
            CalibrationBuilder::new()
                .with_model(CirIntensity::new())
                .with_market_data(market_data())
                .with_curve(FlatCurve::new(0.0))
                .build()
                .unwrap(),
        ]);

        assert_eq!(outcomes.len(), 3);
        // Input order is preserved.
        assert_eq!(outcomes[0].0.model().label(), "HP");
        assert_eq!(outcomes[1].0.model().label(), "IHP");
        assert_eq!(outcomes[2].0.model().label(), "CIR");
        for (calibration, result) in &outcomes {
            assert!(result.is_ok(), "{} failed: {:?}", calibration.model().label(), result);
            assert!(calibration.is_calibrated());
        }
    }

    #[test]
    fn test_batch_isolates_failures() {
        let mut broken = CalibrationBuilder::new()
            .with_model(InhomogeneousPoisson::new())
            .with_market_data(market_data())
            .with_curve(FlatCurve::new(0.0))
            .build()
            .unwrap();
        // Shrink the grid after binding so the fit must fail.
        broken.replace_market_data(
            MarketDataSet::new(
                NaiveDate::from_ymd_opt(2008, 3, 31).unwrap(),
                vec![SpreadQuote::new(5.0, 150.0)],
            )
            .unwrap(),
        );

        let outcomes = calibrate_batch(vec![
            broken,
            CalibrationBuilder::new()
                .with_model(HomogeneousPoisson::new())
                .with_market_data(market_data())
                .with_curve(FlatCurve::new(0.0))
                .build()
                .unwrap(),
        ]);

        assert!(outcomes[0].1.is_err());
        assert!(outcomes[1].1.is_ok());
        assert!(outcomes[1].0.is_calibrated());
    }

    #[test]
    fn test_empty_batch() {
        assert!(calibrate_batch(Vec::new()).is_empty());
    }
}
