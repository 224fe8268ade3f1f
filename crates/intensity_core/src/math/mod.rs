//! Numerical routines.

pub mod solvers;
