//! Premium payment schedules.

/// Payment times for a CDS premium leg maturing at `maturity`, paying
/// `periods_per_year` times per year.
///
/// Times step forward by `1 / periods_per_year` from the first payment;
/// the final time is set to `maturity` exactly, so an off-grid maturity
/// produces a short final stub rather than overshooting.
///
/// Returns an empty vector for a non-positive maturity.
pub fn payment_times(maturity: f64, periods_per_year: u32) -> Vec<f64> {
    if maturity <= 0.0 || periods_per_year == 0 {
        return Vec::new();
    }
    let step = 1.0 / periods_per_year as f64;
    let mut times = Vec::new();
    let mut t = step;
    while t < maturity - step * 1e-9 {
        times.push(t);
        t += step;
    }
    times.push(maturity);
    times
}
