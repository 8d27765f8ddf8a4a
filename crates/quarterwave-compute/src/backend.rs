//! Compute backend trait and device abstraction.
//!
//! The [`ComputeBackend`] trait abstracts over execution strategies (serial,
//! thread pool) so that the transfer-matrix code in `quarterwave-core`
//! remains agnostic of how samples are scheduled.

use num_complex::Complex64;
use thiserror::Error;

/// Errors originating from compute backends.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Backend not available: {0}")]
    Unavailable(String),

    #[error("Device error: {0}")]
    DeviceError(String),
}

/// Describes the capabilities of a compute backend.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub name: String,
    pub backend_type: BackendType,
    pub compute_units: Option<usize>,
}

/// The type of compute backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Serial,
    Cpu,
}

/// Complex amplitude pair `[r, t]` produced for one sample.
pub type Amplitudes = [Complex64; 2];

/// Abstraction over compute backends.
///
/// Each sample of a sweep is independent, so implementations are free to
/// evaluate them in any order. The returned vector must be indexed by sample,
/// i.e. `out[k] == eval(k)`.
pub trait ComputeBackend: Send + Sync {
    /// Return information about the device.
    fn device_info(&self) -> DeviceInfo;

    /// Evaluate `eval` for every index in `0..len`.
    fn evaluate_samples(
        &self,
        len: usize,
        eval: &(dyn Fn(usize) -> Amplitudes + Send + Sync),
    ) -> Result<Vec<Amplitudes>, ComputeError>;
}
