//! Credit default intensity models.
//!
//! Each model maps a parameter vector to a survival curve, and from there
//! to the par CDS spread a protection buyer would pay at a given maturity.
//! The calibration engine only sees the [`IntensityModel`] trait.

pub mod cir;
pub mod model;
pub mod poisson;
pub mod pricing;
pub mod schedule;

pub use cir::{CirIntensity, CirParamIndex};
pub use model::IntensityModel;
pub use poisson::{HomogeneousPoisson, InhomogeneousPoisson};
pub use pricing::par_spread_from_survival;
pub use schedule::payment_times;
