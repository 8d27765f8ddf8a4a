//! # Quarterwave Core
//!
//! The numerical backbone of quarterwave. This crate computes the
//! normal-incidence reflectance and transmittance spectrum of a distributed
//! Bragg reflector: alternating high- and low-index quarter-wave layers
//! between a surrounding medium and a substrate.
//!
//! ## Architecture
//!
//! Solvers implement the [`solver::SpectrumSolver`] trait. The only
//! implementation is the characteristic-matrix method
//! ([`solver::tmm::TransferMatrixSolver`]), which multiplies 2×2 layer
//! matrices ([`matrix::LayerMatrix`]) for every sampled wavelength.
//!
//! ## Modules
//!
//! - [`types`]: Stack configuration, scan window, and result containers.
//! - [`matrix`]: 2×2 complex characteristic matrices.
//! - [`solver`]: Solver trait, errors, and the transfer-matrix implementation.
//! - [`summary`]: Extremum search and stop-band extraction.
//!
//! ## Example
//!
//! ```
//! use quarterwave_core::{compute_spectrum, StackConfig};
//!
//! let result = compute_spectrum(StackConfig::default()).unwrap();
//! let peak = result.peak_reflectance.unwrap();
//! assert!(peak.value > 0.99);
//! ```

pub mod matrix;
pub mod solver;
pub mod summary;
pub mod types;

pub use matrix::LayerMatrix;
pub use solver::tmm::{compute_spectrum, TransferMatrixSolver};
pub use solver::{SolverError, SpectrumSolver};
pub use types::{Extremum, ScanRange, SpectralSample, SpectrumResult, StackConfig, StopBand, Termination};
