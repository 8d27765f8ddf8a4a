//! TOML configuration deserialisation for stack jobs.

use anyhow::{Context, Result};
use serde::Deserialize;

use quarterwave_core::types::{pair_count_from_signed, ScanRange};
use quarterwave_core::{StackConfig, Termination};
use quarterwave_materials::MaterialProvider;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub stack: StackSection,
    #[serde(default)]
    pub scan: ScanSection,
    #[serde(default)]
    pub simulation: SimulationSection,
    #[serde(default)]
    pub output: OutputConfig,
}

/// A refractive index: either a number or a catalogue identifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IndexSpec {
    Value(f64),
    Material(String),
}

/// Termination flag: a boolean or the legacy `"y"`/`"n"` answer.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TerminationSpec {
    Flag(bool),
    Text(String),
}

/// Layer materials and count.
#[derive(Debug, Deserialize)]
pub struct StackSection {
    #[serde(default = "default_medium")]
    pub medium: IndexSpec,
    #[serde(default = "default_substrate")]
    pub substrate: IndexSpec,
    #[serde(default = "default_low")]
    pub low: IndexSpec,
    #[serde(default = "default_high")]
    pub high: IndexSpec,
    #[serde(default = "default_termination")]
    pub terminate_with_high: TerminationSpec,
    /// Signed so that a negative count is reported rather than rejected by the parser.
    #[serde(default = "default_pairs")]
    pub pairs: i64,
}

fn default_medium() -> IndexSpec {
    IndexSpec::Value(1.000278)
}
fn default_substrate() -> IndexSpec {
    IndexSpec::Value(1.46)
}
fn default_low() -> IndexSpec {
    IndexSpec::Value(1.4432)
}
fn default_high() -> IndexSpec {
    IndexSpec::Value(2.1469)
}
fn default_termination() -> TerminationSpec {
    TerminationSpec::Flag(true)
}
fn default_pairs() -> i64 {
    8
}

/// Design wavelength and sampling.
#[derive(Debug, Deserialize)]
pub struct ScanSection {
    #[serde(default = "default_center")]
    pub center_wavelength_nm: f64,
    #[serde(default = "default_half_width")]
    pub half_width_nm: f64,
    /// Explicit `[begin, end]` window in nm; overrides `half_width_nm`.
    #[serde(default)]
    pub range: Option<[f64; 2]>,
    /// Samples per nm.
    #[serde(default = "default_resolution")]
    pub resolution: i64,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            center_wavelength_nm: default_center(),
            half_width_nm: default_half_width(),
            range: None,
            resolution: default_resolution(),
        }
    }
}

fn default_center() -> f64 {
    532.0
}
fn default_half_width() -> f64 {
    quarterwave_core::types::DEFAULT_HALF_WIDTH_NM
}
fn default_resolution() -> i64 {
    1
}

/// Execution settings.
#[derive(Debug, Deserialize)]
pub struct SimulationSection {
    /// Compute backend: "auto", "cpu", or "serial". Default: "auto".
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self { backend: default_backend() }
    }
}

fn default_backend() -> String {
    "auto".into()
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save the spectrum as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_spectra: bool,
    /// Whether to also save the spectrum as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_spectra: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

impl IndexSpec {
    /// Resolve to a numeric index, looking identifiers up in the catalogue.
    pub fn resolve(&self, role: &str) -> Result<f64> {
        match self {
            IndexSpec::Value(n) => Ok(*n),
            IndexSpec::Material(id) => {
                let material = quarterwave_materials::lookup(id)
                    .with_context(|| format!("Unknown material for {}", role))?;
                Ok(material.refractive_index())
            }
        }
    }
}

impl TerminationSpec {
    pub fn resolve(&self) -> Result<Termination> {
        match self {
            TerminationSpec::Flag(flag) => Ok(Termination::from_flag(*flag)),
            TerminationSpec::Text(text) => Ok(text.parse::<Termination>()?),
        }
    }
}

impl JobConfig {
    /// Convert to a validated [`StackConfig`].
    pub fn to_stack_config(&self) -> Result<StackConfig> {
        let stack = &self.stack;
        let pair_count = pair_count_from_signed(stack.pairs)?;
        let resolution_factor = u32::try_from(self.scan.resolution)
            .ok()
            .filter(|&r| r >= 1)
            .with_context(|| {
                format!("scan.resolution must be a positive integer, got {}", self.scan.resolution)
            })?;

        let center = self.scan.center_wavelength_nm;
        let scan_range = match self.scan.range {
            Some([begin, end]) => ScanRange::explicit(begin, end),
            None => ScanRange::around_center(center, self.scan.half_width_nm),
        };

        let config = StackConfig {
            n_medium: stack.medium.resolve("medium")?,
            n_substrate: stack.substrate.resolve("substrate")?,
            n_low: stack.low.resolve("low")?,
            n_high: stack.high.resolve("high")?,
            termination: stack.terminate_with_high.resolve()?,
            center_wavelength_nm: center,
            pair_count,
            scan_range,
            resolution_factor,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parse a TOML job configuration from a string.
pub fn parse_config(content: &str) -> Result<JobConfig> {
    Ok(toml::from_str(content)?)
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
