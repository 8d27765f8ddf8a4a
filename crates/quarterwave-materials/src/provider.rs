//! Material property provider trait.

use thiserror::Error;

/// Errors from material providers.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("Material not found: {0}")]
    NotFound(String),

    #[error("Material '{name}' has invalid refractive index {index}")]
    InvalidIndex { name: String, index: f64 },
}

/// Provides the optical constant of a layer material.
pub trait MaterialProvider: Send + Sync {
    /// Short identifier used in job files (e.g. `"Ta2O5"`).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Real refractive index, independent of wavelength.
    fn refractive_index(&self) -> f64;
}
