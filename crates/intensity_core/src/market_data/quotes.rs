//! Tenor/spread observations for one valuation date.

use super::error::MarketDataError;
use chrono::NaiveDate;

/// A single market observation: a CDS par spread quoted at a tenor.
///
/// Tenors are in years, spreads in basis points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpreadQuote {
    /// Contract maturity point in years (e.g. 1.0, 3.0, 5.0).
    pub tenor: f64,
    /// Observed market par spread in basis points.
    pub spread: f64,
}

impl SpreadQuote {
    /// Create a new quote.
    #[inline]
    pub fn new(tenor: f64, spread: f64) -> Self {
        Self { tenor, spread }
    }
}

/// Ordered set of tenor/spread observations for one valuation date.
///
/// Quotes are validated and sorted by tenor at construction, so every
/// consumer (objective functions, report rows, per-bucket intensity
/// indexing) works off the same sorted grid regardless of input order.
///
/// # Invariants
///
/// - At least one quote
/// - All tenors strictly positive and unique
/// - Quotes held in ascending tenor order
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use intensity_core::market_data::{MarketDataSet, SpreadQuote};
///
/// let date = NaiveDate::from_ymd_opt(2007, 12, 31).unwrap();
/// let data = MarketDataSet::new(
///     date,
///     vec![SpreadQuote::new(5.0, 140.0), SpreadQuote::new(1.0, 100.0)],
/// )
/// .unwrap();
///
/// assert_eq!(data.len(), 2);
/// assert_eq!(data.tenors(), vec![1.0, 5.0]);
/// assert_eq!(data.observations()[0].spread, 100.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketDataSet {
    valuation_date: NaiveDate,
    quotes: Vec<SpreadQuote>,
}

impl MarketDataSet {
    /// Create a validated data set from unordered quotes.
    ///
    /// # Arguments
    ///
    /// * `valuation_date` - The date the spreads were observed
    /// * `quotes` - Tenor/spread pairs in any order
    ///
    /// # Errors
    ///
    /// * [`MarketDataError::NoQuotes`] - If `quotes` is empty
    /// * [`MarketDataError::NonPositiveTenor`] - If any tenor is <= 0
    /// * [`MarketDataError::DuplicateTenor`] - If two quotes share a tenor
    pub fn new(
        valuation_date: NaiveDate,
        mut quotes: Vec<SpreadQuote>,
    ) -> Result<Self, MarketDataError> {
        if quotes.is_empty() {
            return Err(MarketDataError::NoQuotes);
        }
        for q in &quotes {
            if !(q.tenor > 0.0) {
                return Err(MarketDataError::NonPositiveTenor { t: q.tenor });
            }
        }
        quotes.sort_by(|a, b| a.tenor.total_cmp(&b.tenor));
        for pair in quotes.windows(2) {
            if pair[0].tenor == pair[1].tenor {
                return Err(MarketDataError::DuplicateTenor { t: pair[0].tenor });
            }
        }
        Ok(Self {
            valuation_date,
            quotes,
        })
    }

    /// The valuation date the spreads were observed on.
    #[inline]
    pub fn valuation_date(&self) -> NaiveDate {
        self.valuation_date
    }

    /// The sorted tenor grid.
    pub fn tenors(&self) -> Vec<f64> {
        self.quotes.iter().map(|q| q.tenor).collect()
    }

    /// The observations, sorted by tenor.
    #[inline]
    pub fn observations(&self) -> &[SpreadQuote] {
        &self.quotes
    }

    /// Number of tenors (N).
    #[inline]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Always false for a validated set; present for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
