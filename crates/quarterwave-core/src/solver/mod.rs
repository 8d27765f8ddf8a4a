//! Spectrum solver abstraction and implementations.
//!
//! The [`SpectrumSolver`] trait defines the interface between the engine
//! and its callers (CLI, report generators). The characteristic-matrix
//! method in [`tmm`] is the only implementation.

pub mod tmm;

use thiserror::Error;

use crate::matrix::LayerMatrix;
use crate::types::{SpectralSample, SpectrumResult, StackConfig};

/// Errors that can occur while computing a spectrum.
///
/// Numerically degenerate samples are not errors: they are reported per
/// sample in [`SpectrumResult::degenerate_samples`].
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Compute backend error: {0}")]
    ComputeError(String),
}

/// The interface every stack solver implements.
pub trait SpectrumSolver {
    /// Evaluate reflectance and transmittance across the configured scan.
    fn compute_spectrum(&self, config: &StackConfig) -> Result<SpectrumResult, SolverError>;

    /// Evaluate a single wavelength, independent of the scan window.
    fn evaluate_at(
        &self,
        config: &StackConfig,
        wavelength_nm: f64,
    ) -> Result<SpectralSample, SolverError>;

    /// Characteristic matrix of the whole stack at one wavelength.
    fn stack_matrix(
        &self,
        config: &StackConfig,
        wavelength_nm: f64,
    ) -> Result<LayerMatrix, SolverError>;

    /// Human-readable name of the solver method.
    fn method_name(&self) -> &str;
}
