//! Goodness-of-fit reporting.
//!
//! A report is a plain immutable value: the engine computes it from the
//! fitted parameters and hands it over, and how it is rendered (text,
//! LaTeX, anything else) is the caller's concern.

use std::fmt;

use chrono::NaiveDate;

/// One row of the fit report, at one observed tenor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportRow {
    /// Contract maturity in years.
    pub tenor: f64,
    /// Observed market par spread (bps).
    pub market_spread: f64,
    /// Model par spread at the fitted parameters (bps).
    pub model_spread: f64,
    /// Survival probability to this tenor, as a percentage (0-100).
    pub survival_probability_pct: f64,
    /// Piecewise-constant intensity for this tenor's bucket, when the
    /// model has one (inhomogeneous variant only).
    pub intensity: Option<f64>,
}

impl ReportRow {
    /// Signed fit error at this tenor (model minus market, bps).
    pub fn spread_error(&self) -> f64 {
        self.model_spread - self.market_spread
    }
}

/// Immutable calibration fit report.
///
/// Rows are ordered by ascending tenor, matching the sorted grid the
/// calibration worked on. `converged == false` marks a best-effort fit
/// whose optimiser ran out of budget; the rows are still populated from
/// the retained vector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationReport {
    /// Model label ("HP", "IHP", "CIR").
    pub model: String,
    /// Date the market spreads were observed.
    pub valuation_date: NaiveDate,
    /// Whether the optimiser met its tolerance within the budget.
    pub converged: bool,
    /// Optimiser iterations performed.
    pub iterations: usize,
    /// Aggregate root-mean-square spread error (bps).
    pub rmse: f64,
    /// Per-tenor fit rows, ascending by tenor.
    pub rows: Vec<ReportRow>,
}

impl CalibrationReport {
    /// Number of tenors in the report.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the report has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Largest absolute per-tenor spread error (bps).
    pub fn max_abs_error(&self) -> f64 {
        self.rows
            .iter()
            .map(|row| row.spread_error().abs())
            .fold(0.0, f64::max)
    }
}

impl fmt::Display for CalibrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} calibration @ {} (converged: {}, iterations: {}, rmse: {:.4} bps)",
            self.model, self.valuation_date, self.converged, self.iterations, self.rmse
        )?;
        for row in &self.rows {
            write!(
                f,
                "  {:>6.2}y  market {:>8.2}  model {:>8.2}  survival {:>7.3}%",
                row.tenor, row.market_spread, row.model_spread, row.survival_probability_pct
            )?;
            if let Some(intensity) = row.intensity {
                write!(f, "  intensity {:.6}", intensity)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
