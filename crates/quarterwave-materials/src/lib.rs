//! # Quarterwave Materials
//!
//! Material presets for the quarterwave engine. All materials implement the
//! [`MaterialProvider`](provider::MaterialProvider) trait.
//!
//! The engine models lossless, non-dispersive dielectrics, so every preset
//! carries a single real refractive index. Values are representative of the
//! visible range; see <https://refractiveindex.info> for tabulated data.
//!
//! | Identifier | Preset | n |
//! |-----------|--------|---|
//! | `air` | [`ConstantIndexMaterial::air()`] | 1.000278 |
//! | `SiO2` | [`ConstantIndexMaterial::sio2()`] | 1.46 |
//! | `SiO2_film` | [`ConstantIndexMaterial::sio2_film()`] | 1.4432 |
//! | `Ta2O5` | [`ConstantIndexMaterial::ta2o5()`] | 2.1469 |
//! | `TiO2` | [`ConstantIndexMaterial::tio2()`] | 2.40 |
//! | `MgF2` | [`ConstantIndexMaterial::mgf2()`] | 1.38 |

pub mod catalogue;
pub mod provider;

pub use catalogue::{catalogue, lookup, ConstantIndexMaterial};
pub use provider::{MaterialError, MaterialProvider};
