//! # Intensity Models (L2: Business Logic)
//!
//! CDS default-intensity model variants and their par-spread pricing.
//!
//! This crate provides:
//! - The [`IntensityModel`](credit::IntensityModel) capability trait the
//!   calibration engine is parametrised by
//! - Homogeneous Poisson (one shared intensity across all maturities)
//! - Inhomogeneous Poisson (one intensity per tenor bucket, stepping
//!   across the sorted tenor grid)
//! - CIR stochastic intensity (four-factor, closed-form survival)
//! - The shared premium/protection leg decomposition and payment grid
//!
//! ## Design Principles
//!
//! - **Capability objects, not a class hierarchy**: each variant is a
//!   small struct implementing one object-safe trait, so the engine and
//!   the batch driver can hold `Arc<dyn IntensityModel>`
//! - **Declared dimensionality**: every variant states its parameter
//!   count up front for bind-time validation, rather than having vector
//!   length discovered at call time
//! - **Domain errors, never sentinels**: a candidate vector the model
//!   cannot price fails with a `PricingError`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod credit;
