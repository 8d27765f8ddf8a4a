//! Characteristic (transfer) matrix solver for quarter-wave stacks.
//!
//! For each wavelength $\lambda$ every layer has the same phase thickness
//! $\varphi = 2\pi h / \lambda$ with $h = \lambda_0 / 4$. The stack matrix is
//!
//! $$
//! M = (M_H M_L)^N \,[M_H]
//! $$
//!
//! and with medium index $n_0$ and substrate index $n_s$:
//!
//! $$
//! r = \frac{n_0 M_{00} - n_s M_{11} + n_0 n_s M_{01} - M_{10}}{n_0 M_{00} + n_s M_{11} + n_0 n_s M_{01} + M_{10}},
//! \qquad t = \frac{2 n_0}{n_0 M_{00} + n_s M_{11} + n_0 n_s M_{01} + M_{10}}
//! $$
//!
//! giving $R = |r|^2$ and $T = (n_s / n_0)|t|^2$.
//!
//! # Reference
//! H. A. Macleod, *Thin-Film Optical Filters*, 4th ed. (CRC Press, 2010), ch. 2.

use std::f64::consts::PI;
use std::sync::Arc;

use log::{debug, info, warn};
use num_complex::Complex64;
use quarterwave_compute::{Amplitudes, ComputeBackend, SerialBackend};

use super::{SolverError, SpectrumSolver};
use crate::matrix::LayerMatrix;
use crate::types::{SpectralSample, SpectrumResult, StackConfig, Termination};

/// Below this modulus the shared denominator is treated as zero.
const DEGENERATE_DENOMINATOR: f64 = 1e-300;

/// Transfer-matrix solver, holding the backend that schedules the sweep.
pub struct TransferMatrixSolver {
    pub backend: Arc<dyn ComputeBackend>,
}

impl Default for TransferMatrixSolver {
    fn default() -> Self {
        Self {
            backend: quarterwave_compute::default_backend(),
        }
    }
}

impl TransferMatrixSolver {
    pub fn new(backend: Arc<dyn ComputeBackend>) -> Self {
        Self { backend }
    }

    /// Solver that evaluates every sample on the calling thread.
    pub fn serial() -> Self {
        Self::new(Arc::new(SerialBackend))
    }
}

/// Phase thickness of each quarter-wave layer at `wavelength_nm`.
fn phase(config: &StackConfig, wavelength_nm: f64) -> f64 {
    let lambda_m = wavelength_nm * 1e-9;
    (2.0 * PI / lambda_m) * config.quarter_wave_thickness_m()
}

/// Stack matrix without validation; callers check the config first.
fn assemble_stack(config: &StackConfig, wavelength_nm: f64) -> LayerMatrix {
    let phi = phase(config, wavelength_nm);
    let high = LayerMatrix::for_layer(config.n_high, phi);
    let low = LayerMatrix::for_layer(config.n_low, phi);
    let pairs = (high * low).pow(config.pair_count);
    match config.termination {
        Termination::HighIndexCap => pairs * high,
        Termination::PairsOnly => pairs,
    }
}

/// Amplitude reflection and transmission coefficients `[r, t]`.
///
/// Both are `NaN` when the denominator vanishes.
fn boundary_amplitudes(m: &LayerMatrix, n0: f64, ns: f64) -> Amplitudes {
    let n0ns = n0 * ns;
    let denominator = n0 * m.m00 + ns * m.m11 + n0ns * m.m01 + m.m10;
    if !denominator.is_finite() || denominator.norm() < DEGENERATE_DENOMINATOR {
        let nan = Complex64::new(f64::NAN, f64::NAN);
        return [nan, nan];
    }
    let numerator = n0 * m.m00 - ns * m.m11 + n0ns * m.m01 - m.m10;
    [numerator / denominator, Complex64::new(2.0 * n0, 0.0) / denominator]
}

/// Convert amplitudes to power coefficients.
fn to_sample(wavelength_nm: f64, amplitudes: &Amplitudes, n0: f64, ns: f64) -> SpectralSample {
    let [r, t] = *amplitudes;
    let reflectance = r.norm_sqr();
    let transmittance = (ns / n0) * t.norm_sqr();
    if reflectance.is_finite() && transmittance.is_finite() {
        SpectralSample { wavelength_nm, reflectance, transmittance }
    } else {
        SpectralSample {
            wavelength_nm,
            reflectance: f64::NAN,
            transmittance: f64::NAN,
        }
    }
}

fn check_wavelength(wavelength_nm: f64) -> Result<(), SolverError> {
    if !wavelength_nm.is_finite() || wavelength_nm <= 0.0 {
        return Err(SolverError::InvalidConfiguration(format!(
            "wavelength must be positive, got {} nm",
            wavelength_nm
        )));
    }
    Ok(())
}

impl SpectrumSolver for TransferMatrixSolver {
    fn compute_spectrum(&self, config: &StackConfig) -> Result<SpectrumResult, SolverError> {
        config.validate()?;

        let len = config.sample_count();
        let range = config.scan_range;
        let resolution = config.resolution_factor;
        let (n0, ns) = (config.n_medium, config.n_substrate);

        debug!(
            "Sweeping {} samples over [{:.3}, {:.3}] nm, {} layers, backend: {}",
            len,
            range.begin_nm,
            range.end_nm,
            config.layer_count(),
            self.backend.device_info().name
        );

        let kernel = |k: usize| {
            let m = assemble_stack(config, range.wavelength_at(k, resolution));
            boundary_amplitudes(&m, n0, ns)
        };
        let amplitudes = self
            .backend
            .evaluate_samples(len, &kernel)
            .map_err(|e| SolverError::ComputeError(e.to_string()))?;
        if amplitudes.len() != len {
            return Err(SolverError::ComputeError(format!(
                "backend returned {} samples, expected {}",
                amplitudes.len(),
                len
            )));
        }

        let mut wavelengths = Vec::with_capacity(len);
        let mut reflectance = Vec::with_capacity(len);
        let mut transmittance = Vec::with_capacity(len);
        let mut degenerate = Vec::new();

        for (k, amp) in amplitudes.iter().enumerate() {
            let sample = to_sample(range.wavelength_at(k, resolution), amp, n0, ns);
            if sample.is_degenerate() {
                debug!("Degenerate sample at λ={:.6} nm", sample.wavelength_nm);
                degenerate.push(k);
            }
            wavelengths.push(sample.wavelength_nm);
            reflectance.push(sample.reflectance);
            transmittance.push(sample.transmittance);
        }

        if let Some(&first) = degenerate.first() {
            warn!(
                "{} of {} samples are numerically degenerate (first at λ={:.3} nm); marked as NaN",
                degenerate.len(),
                len,
                wavelengths[first]
            );
        }

        let result = SpectrumResult::from_parts(wavelengths, reflectance, transmittance, degenerate);

        if let Some(peak) = result.peak_reflectance {
            info!(
                "R_max = {:.4} at {:.1} nm ({} pairs, n_H/n_L = {:.2}/{:.2})",
                peak.value, peak.wavelength_nm, config.pair_count, config.n_high, config.n_low
            );
        }

        Ok(result)
    }

    fn evaluate_at(
        &self,
        config: &StackConfig,
        wavelength_nm: f64,
    ) -> Result<SpectralSample, SolverError> {
        let m = self.stack_matrix(config, wavelength_nm)?;
        let amplitudes = boundary_amplitudes(&m, config.n_medium, config.n_substrate);
        Ok(to_sample(wavelength_nm, &amplitudes, config.n_medium, config.n_substrate))
    }

    fn stack_matrix(
        &self,
        config: &StackConfig,
        wavelength_nm: f64,
    ) -> Result<LayerMatrix, SolverError> {
        config.validate_stack()?;
        check_wavelength(wavelength_nm)?;
        Ok(assemble_stack(config, wavelength_nm))
    }

    fn method_name(&self) -> &str {
        "Characteristic matrix (normal incidence)"
    }
}

/// Compute the spectrum of `config` with the default solver.
pub fn compute_spectrum(config: StackConfig) -> Result<SpectrumResult, SolverError> {
    TransferMatrixSolver::default().compute_spectrum(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_phase_is_quarter_wave_at_center() {
        let cfg = StackConfig::default();
        assert_abs_diff_eq!(phase(&cfg, 532.0), PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(phase(&cfg, 266.0), PI, epsilon = 1e-12);
    }

    #[test]
    fn test_quarter_wave_stack_matches_admittance_formula() {
        // At the design wavelength the (HL)^N H stack presents an admittance
        // Y = (nH/nL)^(2N) nH^2 / ns to the medium.
        let cfg = StackConfig::default();
        let sample = TransferMatrixSolver::serial().evaluate_at(&cfg, 532.0).unwrap();
        let y = (cfg.n_high / cfg.n_low).powi(2 * cfg.pair_count as i32) * cfg.n_high.powi(2)
            / cfg.n_substrate;
        let expected = ((cfg.n_medium - y) / (cfg.n_medium + y)).powi(2);
        assert_abs_diff_eq!(sample.reflectance, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_denominator_yields_nan() {
        let zero = Complex64::new(0.0, 0.0);
        let m = LayerMatrix::new(zero, zero, zero, zero);
        let amp = boundary_amplitudes(&m, 1.0, 1.5);
        let sample = to_sample(500.0, &amp, 1.0, 1.5);
        assert!(sample.is_degenerate());
        assert!(sample.reflectance.is_nan() && sample.transmittance.is_nan());
    }

    #[test]
    fn test_evaluate_rejects_non_positive_wavelength() {
        let solver = TransferMatrixSolver::serial();
        assert!(solver.evaluate_at(&StackConfig::default(), 0.0).is_err());
        assert!(solver.evaluate_at(&StackConfig::default(), -5.0).is_err());
    }
}
