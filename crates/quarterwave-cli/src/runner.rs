//! Job runner: resolves the configuration, runs the solver, writes results.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;

use quarterwave_compute::{ComputeBackend, CpuBackend, SerialBackend};
use quarterwave_core::{SpectrumResult, SpectrumSolver, StackConfig, TransferMatrixSolver};

use crate::config::JobConfig;

/// Stop-band edges are reported where R falls below this fraction of the peak.
const STOP_BAND_FRACTION: f64 = 0.99;

/// Results from one job.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub config: StackConfig,
    pub spectrum: SpectrumResult,
}

/// Run a job from a parsed configuration.
pub fn run_job(job: &JobConfig) -> Result<RunOutput> {
    let config = job.to_stack_config()?;
    debug!("Resolved stack configuration: {:?}", config);
    let backend = create_backend(&job.simulation.backend)?;

    println!(
        "Stack: {} (N = {}, {} layers), n_H/n_L = {}/{}",
        config.termination,
        config.pair_count,
        config.layer_count(),
        config.n_high,
        config.n_low
    );
    println!(
        "Scan: {} samples over [{:.3}, {:.3}] nm",
        config.sample_count(),
        config.scan_range.begin_nm,
        config.scan_range.end_nm
    );

    let solver = TransferMatrixSolver::new(backend);
    let spectrum = solver
        .compute_spectrum(&config)
        .context("Spectrum computation failed")?;

    print_summary(&config, &spectrum);
    Ok(RunOutput { config, spectrum })
}

/// Print the peak reflectance, minimum transmittance, and stop band.
pub fn print_summary(config: &StackConfig, spectrum: &SpectrumResult) {
    match spectrum.peak_reflectance {
        Some(peak) => {
            println!(
                "  R_max = {:.2}% at {:.0} nm",
                peak.value * 100.0,
                peak.wavelength_nm.round()
            );
            if let Some(band) = spectrum.stop_band(peak.value * STOP_BAND_FRACTION) {
                println!(
                    "  Stop band (R >= {:.0}% of peak): {:.0}-{:.0} nm, width {:.0} nm",
                    STOP_BAND_FRACTION * 100.0,
                    band.lower_nm,
                    band.upper_nm,
                    band.width_nm()
                );
            }
        }
        None => println!("  R_max: no valid samples"),
    }
    if let Some(t_min) = spectrum.min_transmittance {
        println!(
            "  T_min = {:.2}% at {:.0} nm",
            t_min.value * 100.0,
            t_min.wavelength_nm.round()
        );
    }
    println!(
        "  {} pairs of n_H/n_L = {:.2}/{:.2}",
        config.pair_count, config.n_high, config.n_low
    );
    if !spectrum.degenerate_samples.is_empty() {
        eprintln!(
            "Warning: {} degenerate samples were written as NaN",
            spectrum.degenerate_samples.len()
        );
    }
}

/// Write the spectrum to a CSV file with a metadata header.
pub fn write_spectrum_csv(run: &RunOutput, path: &Path) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let cfg = &run.config;

    writeln!(file, "# Quarterwave Bragg Stack Solver: Normal-Incidence Spectrum")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# n_medium: {}", cfg.n_medium)?;
    writeln!(file, "# n_substrate: {}", cfg.n_substrate)?;
    writeln!(file, "# n_low: {}", cfg.n_low)?;
    writeln!(file, "# n_high: {}", cfg.n_high)?;
    writeln!(file, "# stack: {}, pairs: {}", cfg.termination, cfg.pair_count)?;
    writeln!(file, "# center_wavelength_nm: {}", cfg.center_wavelength_nm)?;
    writeln!(file, "# resolution: {} samples/nm", cfg.resolution_factor)?;
    writeln!(file, "#")?;
    writeln!(file, "wavelength_nm,reflectance,transmittance")?;

    for s in run.spectrum.samples() {
        writeln!(
            file,
            "{:.6},{:.10e},{:.10e}",
            s.wavelength_nm, s.reflectance, s.transmittance
        )?;
    }

    println!("Spectrum written to: {}", path.display());
    Ok(())
}

/// Write the configuration and spectrum to a JSON file.
///
/// Degenerate samples serialise as `null`.
pub fn write_spectrum_json(run: &RunOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(run).context("JSON serialisation error")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Spectrum (JSON) written to: {}", path.display());
    Ok(())
}

/// Create a compute backend based on the user's preference string.
///
/// - `"serial"`: single thread.
/// - `"cpu"`: Rayon thread pool.
/// - `"auto"` (default): the build's preferred backend.
fn create_backend(preference: &str) -> Result<Arc<dyn ComputeBackend>> {
    let backend: Arc<dyn ComputeBackend> = match preference {
        "serial" => Arc::new(SerialBackend),
        "cpu" => Arc::new(CpuBackend::new()),
        "auto" => quarterwave_compute::default_backend(),
        other => anyhow::bail!(
            "Unsupported backend '{}'. Valid backends: auto, cpu, serial",
            other
        ),
    };
    println!("Backend: {}", backend.device_info().name);
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn small_job(extra: &str) -> JobConfig {
        parse_config(&format!(
            "[stack]\npairs = 6\n[scan]\nrange = [500.0, 560.0]\n{}",
            extra
        ))
        .unwrap()
    }

    #[test]
    fn test_run_job_serial_backend() {
        let job = small_job("[simulation]\nbackend = \"serial\"\n");
        let run = run_job(&job).unwrap();
        assert_eq!(run.spectrum.len(), 60);
        assert!(run.spectrum.peak_reflectance.unwrap().value > 0.9);
    }

    #[test]
    fn test_pair_count_above_half_u32_runs() {
        let job = parse_config(
            "[stack]\npairs = 3000000000\n[scan]\nrange = [500.0, 505.0]\n[simulation]\nbackend = \"serial\"\n",
        )
        .unwrap();
        let run = run_job(&job).unwrap();
        assert_eq!(run.config.layer_count(), 6_000_000_001);
        assert_eq!(run.spectrum.len(), 5);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let job = small_job("[simulation]\nbackend = \"gpu\"\n");
        assert!(run_job(&job).is_err());
    }

    #[test]
    fn test_csv_has_header_and_one_row_per_sample() {
        let run = run_job(&small_job("")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("spectrum.csv");
        write_spectrum_csv(&run, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let data: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(data[0], "wavelength_nm,reflectance,transmittance");
        assert_eq!(data.len(), 1 + run.spectrum.len());
        assert!(text.contains("# n_high: 2.1469"));
    }

    #[test]
    fn test_json_contains_config_and_spectrum() {
        let run = run_job(&small_job("")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectrum.json");
        write_spectrum_json(&run, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["config"]["pair_count"], 6);
        assert_eq!(value["config"]["termination"], "high_index_cap");
        assert_eq!(value["spectrum"]["reflectance"].as_array().unwrap().len(), 60);
    }
}
