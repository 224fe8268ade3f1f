//! Shared trait and vocabulary definitions.

pub mod calibration;
