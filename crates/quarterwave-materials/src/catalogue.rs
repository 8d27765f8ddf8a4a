//! Built-in constant-index presets and identifier lookup.

use serde::Serialize;

use crate::provider::{MaterialError, MaterialProvider};

/// A lossless dielectric with a fixed real refractive index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstantIndexMaterial {
    name: String,
    description: String,
    index: f64,
}

impl ConstantIndexMaterial {
    /// Construct a custom material.
    ///
    /// Fails with [`MaterialError::InvalidIndex`] if `index` is not a finite
    /// positive number.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        index: f64,
    ) -> Result<Self, MaterialError> {
        let name = name.into();
        if !index.is_finite() || index <= 0.0 {
            return Err(MaterialError::InvalidIndex { name, index });
        }
        Ok(Self {
            name,
            description: description.into(),
            index,
        })
    }

    fn preset(name: &str, description: &str, index: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            index,
        }
    }

    /// Dry air at standard conditions.
    pub fn air() -> Self {
        Self::preset("air", "Air (surrounding medium)", 1.000278)
    }

    /// Fused silica substrate.
    pub fn sio2() -> Self {
        Self::preset("SiO2", "Fused silica SiO\u{2082} (substrate)", 1.46)
    }

    /// Sputtered SiO₂ thin film near 540 nm (low-index layer).
    pub fn sio2_film() -> Self {
        Self::preset("SiO2_film", "SiO\u{2082} thin film, ~540 nm (low index)", 1.4432)
    }

    /// Ta₂O₅ thin film near 540 nm (high-index layer).
    pub fn ta2o5() -> Self {
        Self::preset("Ta2O5", "Ta\u{2082}O\u{2085} thin film, ~540 nm (high index)", 2.1469)
    }

    /// TiO₂ thin film (high-index layer).
    pub fn tio2() -> Self {
        Self::preset("TiO2", "TiO\u{2082} thin film, visible (high index)", 2.40)
    }

    /// MgF₂ thin film (low-index layer).
    pub fn mgf2() -> Self {
        Self::preset("MgF2", "MgF\u{2082} thin film, visible (low index)", 1.38)
    }
}

impl MaterialProvider for ConstantIndexMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn refractive_index(&self) -> f64 {
        self.index
    }
}

/// All built-in presets, in display order.
pub fn catalogue() -> Vec<ConstantIndexMaterial> {
    vec![
        ConstantIndexMaterial::air(),
        ConstantIndexMaterial::sio2(),
        ConstantIndexMaterial::sio2_film(),
        ConstantIndexMaterial::ta2o5(),
        ConstantIndexMaterial::tio2(),
        ConstantIndexMaterial::mgf2(),
    ]
}

/// Resolve a preset by identifier (case-insensitive).
pub fn lookup(id: &str) -> Result<ConstantIndexMaterial, MaterialError> {
    let wanted = id.trim();
    catalogue()
        .into_iter()
        .find(|m| m.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            let valid: Vec<String> = catalogue().into_iter().map(|m| m.name).collect();
            MaterialError::NotFound(format!(
                "'{}'. Valid identifiers: {}",
                id,
                valid.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let m = lookup("ta2o5").unwrap();
        assert_eq!(m.name(), "Ta2O5");
        assert_eq!(m.refractive_index(), 2.1469);
        assert_eq!(lookup(" AIR ").unwrap().refractive_index(), 1.000278);
    }

    #[test]
    fn test_lookup_unknown_lists_valid_ids() {
        let err = lookup("unobtainium").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unobtainium"));
        assert!(msg.contains("SiO2_film"));
    }

    #[test]
    fn test_custom_material_rejects_non_positive_index() {
        assert!(ConstantIndexMaterial::new("x", "bad", 0.0).is_err());
        assert!(ConstantIndexMaterial::new("x", "bad", f64::NAN).is_err());
        assert!(ConstantIndexMaterial::new("x", "ok", 1.7).is_ok());
    }

    #[test]
    fn test_catalogue_indices_are_physical() {
        for m in catalogue() {
            assert!(m.refractive_index() >= 1.0, "{} has n < 1", m.name());
        }
    }
}
