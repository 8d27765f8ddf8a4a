//! # Quarterwave Compute
//!
//! Compute backend abstraction for the quarterwave engine. This crate
//! provides a [`ComputeBackend`](backend::ComputeBackend) trait that isolates
//! the thin-film physics from how the wavelength sweep is executed.
//!
//! ## Available backends
//!
//! | Backend | Feature flag | Status |
//! |---------|-------------|--------|
//! | Serial | always | Implemented |
//! | CPU (Rayon) | `cpu` (default) | Implemented |

pub mod backend;
pub mod serial;

#[cfg(feature = "cpu")]
pub mod cpu;

pub use backend::{Amplitudes, BackendType, ComputeBackend, ComputeError, DeviceInfo};
pub use serial::SerialBackend;

#[cfg(feature = "cpu")]
pub use cpu::CpuBackend;

/// Construct the preferred backend for this build.
///
/// Returns the Rayon backend when the `cpu` feature is enabled, otherwise
/// the serial backend.
pub fn default_backend() -> std::sync::Arc<dyn ComputeBackend> {
    #[cfg(feature = "cpu")]
    {
        std::sync::Arc::new(CpuBackend::new())
    }
    #[cfg(not(feature = "cpu"))]
    {
        std::sync::Arc::new(SerialBackend)
    }
}
