//! Core types shared across quarterwave.
//!
//! This module defines the stack configuration consumed by the solver, the
//! wavelength scan window, and the spectrum returned to callers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::solver::SolverError;
use crate::summary;

/// Offset added to both ends of the conventional scan window so that no
/// sampled wavelength lands exactly on zero.
pub const SCAN_EPSILON_NM: f64 = 1e-6;

/// Conventional half width of the scan window around the design wavelength (nm).
pub const DEFAULT_HALF_WIDTH_NM: f64 = 400.0;

/// Largest sweep accepted by [`StackConfig::validate`].
pub const MAX_SAMPLE_COUNT: usize = 10_000_000;

/// How the layer sequence ends on the substrate side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// medium | (HL)^N H | substrate. The extra high-index layer raises the
    /// peak reflectance.
    HighIndexCap,
    /// medium | (HL)^N | substrate.
    PairsOnly,
}

impl Termination {
    pub fn from_flag(high_index_terminates: bool) -> Self {
        if high_index_terminates {
            Termination::HighIndexCap
        } else {
            Termination::PairsOnly
        }
    }

    pub fn is_high_index_cap(self) -> bool {
        matches!(self, Termination::HighIndexCap)
    }
}

impl FromStr for Termination {
    type Err = SolverError;

    /// Accepts `y`/`yes`/`high`/`true` and `n`/`no`/`none`/`false`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "high" | "high_index_cap" | "true" => Ok(Termination::HighIndexCap),
            "n" | "no" | "none" | "pairs_only" | "false" => Ok(Termination::PairsOnly),
            other => Err(SolverError::InvalidConfiguration(format!(
                "termination must be 'y' or 'n' (or 'high'/'none'), got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::HighIndexCap => write!(f, "(HL)^N H"),
            Termination::PairsOnly => write!(f, "(HL)^N"),
        }
    }
}

/// Wavelength window [begin, end] in nanometres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanRange {
    pub begin_nm: f64,
    pub end_nm: f64,
}

impl ScanRange {
    /// Window of `half_width_nm` either side of `center_nm`.
    ///
    /// Both ends are shifted by [`SCAN_EPSILON_NM`]. If the lower end would be
    /// negative (designs below ~400 nm) it is folded into the first nanometre
    /// as `(1000 + begin) / 1000`, i.e. the same offset read in picometres.
    pub fn around_center(center_nm: f64, half_width_nm: f64) -> Self {
        let mut begin_nm = center_nm - half_width_nm + SCAN_EPSILON_NM;
        let end_nm = center_nm + half_width_nm + SCAN_EPSILON_NM;
        if begin_nm < 0.0 {
            begin_nm = (1000.0 + begin_nm) / 1000.0;
        }
        Self { begin_nm, end_nm }
    }

    /// An explicit window, used as given.
    pub fn explicit(begin_nm: f64, end_nm: f64) -> Self {
        Self { begin_nm, end_nm }
    }

    /// Number of samples at `resolution` samples per nm.
    pub fn sample_count(&self, resolution: u32) -> usize {
        let span = (self.end_nm - self.begin_nm) * resolution as f64;
        if span.is_finite() && span > 0.0 {
            span.round() as usize
        } else {
            0
        }
    }

    /// Wavelength of sample `k` (nm).
    pub fn wavelength_at(&self, k: usize, resolution: u32) -> f64 {
        self.begin_nm + k as f64 / resolution as f64
    }

    fn validate(&self) -> Result<(), SolverError> {
        if !self.begin_nm.is_finite() || !self.end_nm.is_finite() {
            return Err(SolverError::InvalidConfiguration(format!(
                "scan range must be finite, got [{}, {}] nm",
                self.begin_nm, self.end_nm
            )));
        }
        if self.begin_nm <= 0.0 {
            return Err(SolverError::InvalidConfiguration(format!(
                "scan range must start above 0 nm, got {} nm",
                self.begin_nm
            )));
        }
        if self.end_nm <= self.begin_nm {
            return Err(SolverError::InvalidConfiguration(format!(
                "scan range end ({} nm) must exceed its start ({} nm)",
                self.end_nm, self.begin_nm
            )));
        }
        Ok(())
    }
}

/// Parameters defining one quarter-wave stack computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    /// Refractive index of the incident medium.
    pub n_medium: f64,
    /// Refractive index of the substrate.
    pub n_substrate: f64,
    /// Low-index layer material.
    pub n_low: f64,
    /// High-index layer material.
    pub n_high: f64,
    pub termination: Termination,
    /// Design wavelength at which every layer is a quarter wave thick (nm).
    pub center_wavelength_nm: f64,
    /// Number of H/L bilayers.
    pub pair_count: u32,
    pub scan_range: ScanRange,
    /// Samples per nm.
    pub resolution_factor: u32,
}

impl Default for StackConfig {
    /// Ta₂O₅/SiO₂ mirror for 532 nm on fused silica in air.
    fn default() -> Self {
        Self::new(1.000278, 1.46, 1.4432, 2.1469, Termination::HighIndexCap, 532.0, 8)
    }
}

impl StackConfig {
    /// Build a config with the conventional scan window (center ± 400 nm) at
    /// one sample per nm.
    pub fn new(
        n_medium: f64,
        n_substrate: f64,
        n_low: f64,
        n_high: f64,
        termination: Termination,
        center_wavelength_nm: f64,
        pair_count: u32,
    ) -> Self {
        Self {
            n_medium,
            n_substrate,
            n_low,
            n_high,
            termination,
            center_wavelength_nm,
            pair_count,
            scan_range: ScanRange::around_center(center_wavelength_nm, DEFAULT_HALF_WIDTH_NM),
            resolution_factor: 1,
        }
    }

    pub fn with_scan_range(mut self, scan_range: ScanRange) -> Self {
        self.scan_range = scan_range;
        self
    }

    pub fn with_resolution(mut self, resolution_factor: u32) -> Self {
        self.resolution_factor = resolution_factor;
        self
    }

    /// Check the indices and design wavelength only.
    pub fn validate_stack(&self) -> Result<(), SolverError> {
        let indices = [
            ("n_medium", self.n_medium),
            ("n_substrate", self.n_substrate),
            ("n_low", self.n_low),
            ("n_high", self.n_high),
        ];
        for (label, n) in indices {
            if !n.is_finite() || n <= 0.0 {
                return Err(SolverError::InvalidConfiguration(format!(
                    "{} must be a positive refractive index, got {}",
                    label, n
                )));
            }
        }
        if !self.center_wavelength_nm.is_finite() || self.center_wavelength_nm <= 0.0 {
            return Err(SolverError::InvalidConfiguration(format!(
                "center wavelength must be positive, got {} nm",
                self.center_wavelength_nm
            )));
        }
        Ok(())
    }

    /// Check every constraint required before a sweep.
    pub fn validate(&self) -> Result<(), SolverError> {
        self.validate_stack()?;
        if self.resolution_factor == 0 {
            return Err(SolverError::InvalidConfiguration(
                "resolution factor must be at least 1".into(),
            ));
        }
        self.scan_range.validate()?;
        let samples = self.sample_count();
        if samples > MAX_SAMPLE_COUNT {
            return Err(SolverError::InvalidConfiguration(format!(
                "scan range [{}, {}] nm at {} samples/nm exceeds the limit of {} samples",
                self.scan_range.begin_nm, self.scan_range.end_nm, self.resolution_factor, MAX_SAMPLE_COUNT
            )));
        }
        if samples == 0 {
            return Err(SolverError::InvalidConfiguration(format!(
                "scan range [{}, {}] nm yields no samples",
                self.scan_range.begin_nm, self.scan_range.end_nm
            )));
        }
        Ok(())
    }

    /// Physical thickness parameter of every layer: a quarter of the design
    /// wavelength, in metres.
    pub fn quarter_wave_thickness_m(&self) -> f64 {
        self.center_wavelength_nm * 1e-9 / 4.0
    }

    pub fn sample_count(&self) -> usize {
        self.scan_range.sample_count(self.resolution_factor)
    }

    /// Sampled wavelengths in ascending order (nm).
    pub fn wavelengths(&self) -> Vec<f64> {
        (0..self.sample_count())
            .map(|k| self.scan_range.wavelength_at(k, self.resolution_factor))
            .collect()
    }

    /// Total number of layers in the stack.
    pub fn layer_count(&self) -> u64 {
        2 * u64::from(self.pair_count) + u64::from(self.termination.is_high_index_cap())
    }
}

/// Convert an externally supplied signed pair count.
pub fn pair_count_from_signed(pairs: i64) -> Result<u32, SolverError> {
    u32::try_from(pairs).map_err(|_| {
        SolverError::InvalidConfiguration(format!(
            "pair count must be a non-negative integer, got {}",
            pairs
        ))
    })
}

/// Reflectance and transmittance at one wavelength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralSample {
    pub wavelength_nm: f64,
    /// `NaN` if the sample was numerically degenerate.
    pub reflectance: f64,
    /// `NaN` if the sample was numerically degenerate.
    pub transmittance: f64,
}

impl SpectralSample {
    pub fn is_degenerate(&self) -> bool {
        !self.reflectance.is_finite() || !self.transmittance.is_finite()
    }
}

/// Location and value of a spectral extremum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    pub wavelength_nm: f64,
    pub value: f64,
    /// Index into the sample sequences.
    pub index: usize,
}

/// Contiguous wavelength band around the reflectance peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopBand {
    pub lower_nm: f64,
    pub upper_nm: f64,
}

impl StopBand {
    pub fn width_nm(&self) -> f64 {
        self.upper_nm - self.lower_nm
    }
}

/// Complete spectrum for one stack configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumResult {
    /// Ascending sample wavelengths (nm).
    pub wavelengths_nm: Vec<f64>,
    pub reflectance: Vec<f64>,
    pub transmittance: Vec<f64>,
    /// Maximum reflectance; ties resolve to the shortest wavelength.
    pub peak_reflectance: Option<Extremum>,
    /// Minimum transmittance; ties resolve to the shortest wavelength.
    pub min_transmittance: Option<Extremum>,
    /// Indices of samples whose denominator vanished.
    pub degenerate_samples: Vec<usize>,
}

impl SpectrumResult {
    /// Assemble a result from aligned sequences, deriving the summary scalars.
    ///
    /// # Panics
    /// Panics if the three sequences differ in length.
    pub fn from_parts(
        wavelengths_nm: Vec<f64>,
        reflectance: Vec<f64>,
        transmittance: Vec<f64>,
        degenerate_samples: Vec<usize>,
    ) -> Self {
        assert_eq!(
            wavelengths_nm.len(),
            reflectance.len(),
            "reflectance must have one entry per wavelength"
        );
        assert_eq!(
            wavelengths_nm.len(),
            transmittance.len(),
            "transmittance must have one entry per wavelength"
        );

        let peak_reflectance = summary::argmax(&reflectance).map(|index| Extremum {
            wavelength_nm: wavelengths_nm[index],
            value: reflectance[index],
            index,
        });
        let min_transmittance = summary::argmin(&transmittance).map(|index| Extremum {
            wavelength_nm: wavelengths_nm[index],
            value: transmittance[index],
            index,
        });

        Self {
            wavelengths_nm,
            reflectance,
            transmittance,
            peak_reflectance,
            min_transmittance,
            degenerate_samples,
        }
    }

    pub fn len(&self) -> usize {
        self.wavelengths_nm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths_nm.is_empty()
    }

    pub fn sample(&self, index: usize) -> Option<SpectralSample> {
        Some(SpectralSample {
            wavelength_nm: *self.wavelengths_nm.get(index)?,
            reflectance: *self.reflectance.get(index)?,
            transmittance: *self.transmittance.get(index)?,
        })
    }

    pub fn samples(&self) -> impl Iterator<Item = SpectralSample> + '_ {
        (0..self.len()).filter_map(move |i| self.sample(i))
    }

    /// Sample nearest to `wavelength_nm`.
    pub fn nearest(&self, wavelength_nm: f64) -> Option<SpectralSample> {
        summary::nearest_index(&self.wavelengths_nm, wavelength_nm).and_then(|i| self.sample(i))
    }

    /// Reflectance of the sample nearest to `wavelength_nm`.
    pub fn reflectance_at(&self, wavelength_nm: f64) -> Option<f64> {
        self.nearest(wavelength_nm).map(|s| s.reflectance)
    }

    /// Band around the peak where `R >= threshold`.
    pub fn stop_band(&self, threshold: f64) -> Option<StopBand> {
        let peak = self.peak_reflectance?;
        summary::band_around(&self.reflectance, peak.index, threshold).map(|(lo, hi)| StopBand {
            lower_nm: self.wavelengths_nm[lo],
            upper_nm: self.wavelengths_nm[hi],
        })
    }

    /// Width of [`stop_band`](Self::stop_band) in nm.
    pub fn bandwidth_above(&self, threshold: f64) -> Option<f64> {
        self.stop_band(threshold).map(|b| b.width_nm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_scan_range_conventional_window() {
        let r = ScanRange::around_center(532.0, DEFAULT_HALF_WIDTH_NM);
        assert_abs_diff_eq!(r.begin_nm, 132.000001, epsilon = 1e-9);
        assert_abs_diff_eq!(r.end_nm, 932.000001, epsilon = 1e-9);
        assert_eq!(r.sample_count(1), 800);
        assert_eq!(r.sample_count(4), 3200);
    }

    #[test]
    fn test_scan_range_folds_negative_start() {
        let r = ScanRange::around_center(100.0, DEFAULT_HALF_WIDTH_NM);
        assert!(r.begin_nm > 0.0 && r.begin_nm < 1.0);
        assert_abs_diff_eq!(r.begin_nm, (1000.0 - 300.0 + 1e-6) / 1000.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wavelengths_ascend_at_resolution() {
        let cfg = StackConfig::default().with_resolution(2);
        let wl = cfg.wavelengths();
        assert_eq!(wl.len(), 1600);
        assert_abs_diff_eq!(wl[1] - wl[0], 0.5, epsilon = 1e-9);
        assert!(wl.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_termination_parsing() {
        assert_eq!("y".parse::<Termination>().unwrap(), Termination::HighIndexCap);
        assert_eq!("N".parse::<Termination>().unwrap(), Termination::PairsOnly);
        assert_eq!(" high ".parse::<Termination>().unwrap(), Termination::HighIndexCap);
        assert!(matches!(
            "maybe".parse::<Termination>(),
            Err(SolverError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_index = StackConfig { n_low: 0.0, ..StackConfig::default() };
        assert!(bad_index.validate().is_err());

        let bad_center = StackConfig { center_wavelength_nm: -1.0, ..StackConfig::default() };
        assert!(bad_center.validate().is_err());

        let bad_res = StackConfig::default().with_resolution(0);
        assert!(bad_res.validate().is_err());

        let inverted = StackConfig::default().with_scan_range(ScanRange::explicit(700.0, 400.0));
        assert!(inverted.validate().is_err());

        assert!(StackConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_pair_count_is_rejected() {
        assert_eq!(pair_count_from_signed(8).unwrap(), 8);
        assert!(pair_count_from_signed(-1).is_err());
    }

    #[test]
    fn test_layer_count() {
        let cfg = StackConfig::default();
        assert_eq!(cfg.layer_count(), 17);
        let bare = StackConfig { termination: Termination::PairsOnly, pair_count: 0, ..cfg };
        assert_eq!(bare.layer_count(), 0);
    }

    #[test]
    fn test_layer_count_beyond_u32_pairs() {
        let huge = StackConfig { pair_count: 3_000_000_000, ..StackConfig::default() };
        assert_eq!(huge.layer_count(), 6_000_000_001);
        let max = StackConfig { pair_count: u32::MAX, termination: Termination::PairsOnly, ..huge };
        assert_eq!(max.layer_count(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_oversized_sweep_is_rejected() {
        let dense = StackConfig::default().with_resolution(u32::MAX);
        assert!(matches!(dense.validate(), Err(SolverError::InvalidConfiguration(_))));

        let wide = StackConfig::default().with_scan_range(ScanRange::explicit(1.0, 1e12));
        assert!(matches!(wide.validate(), Err(SolverError::InvalidConfiguration(_))));

        let at_limit = StackConfig::default()
            .with_scan_range(ScanRange::explicit(1.0, 1.0 + MAX_SAMPLE_COUNT as f64));
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    #[should_panic(expected = "one entry per wavelength")]
    fn test_from_parts_rejects_misaligned_sequences() {
        SpectrumResult::from_parts(vec![500.0, 501.0], vec![0.5], vec![0.5, 0.5], vec![]);
    }

    #[test]
    fn test_extrema_and_stop_band() {
        let wl = vec![500.0, 501.0, 502.0, 503.0, 504.0, 505.0];
        let r = vec![0.1, 0.95, 0.99, 0.99, 0.2, 0.99];
        let t: Vec<f64> = r.iter().map(|x| 1.0 - x).collect();
        let res = SpectrumResult::from_parts(wl, r, t, vec![]);

        let peak = res.peak_reflectance.unwrap();
        assert_eq!(peak.index, 2);
        assert_eq!(peak.wavelength_nm, 502.0);
        assert_eq!(res.min_transmittance.unwrap().index, 2);

        let band = res.stop_band(0.9).unwrap();
        assert_eq!(band.lower_nm, 501.0);
        assert_eq!(band.upper_nm, 503.0);
        assert_abs_diff_eq!(res.bandwidth_above(0.9).unwrap(), 2.0);
        assert_eq!(res.reflectance_at(504.4), Some(0.2));
    }
}
