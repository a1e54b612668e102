//! Data models

pub mod assignment;
pub mod material;
pub mod preset;
pub mod shading_network;

pub use assignment::Assignment;
pub use material::Material;
pub use preset::{Preset, PresetField, PresetKind};
pub use shading_network::ShadingNetwork;
