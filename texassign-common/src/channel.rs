//! Shader channels a texture can be assigned to

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A shader input slot expecting one texture
///
/// Ordering follows the order in which channels are wired into a shader,
/// which keeps `BTreeMap<Channel, _>` output stable and readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    BaseColor,
    Normal,
    Roughness,
    Metalness,
    Displacement,
    Emissive,
    Subsurface,
    Opacity,
    Translucency,
}

impl Channel {
    /// Every channel, in wiring order
    pub const ALL: [Channel; 9] = [
        Channel::BaseColor,
        Channel::Normal,
        Channel::Roughness,
        Channel::Metalness,
        Channel::Displacement,
        Channel::Emissive,
        Channel::Subsurface,
        Channel::Opacity,
        Channel::Translucency,
    ];

    /// Host-facing label, also used as the texture node name
    pub fn label(&self) -> &'static str {
        match self {
            Channel::BaseColor => "BaseColor",
            Channel::Normal => "Normal",
            Channel::Roughness => "Roughness",
            Channel::Metalness => "Metalness",
            Channel::Displacement => "Displacement",
            Channel::Emissive => "Emissive",
            Channel::Subsurface => "Subsurface",
            Channel::Opacity => "Opacity",
            Channel::Translucency => "Translucency",
        }
    }

    /// Config key (`snake_case`)
    pub fn key(&self) -> &'static str {
        match self {
            Channel::BaseColor => "base_color",
            Channel::Normal => "normal",
            Channel::Roughness => "roughness",
            Channel::Metalness => "metalness",
            Channel::Displacement => "displacement",
            Channel::Emissive => "emissive",
            Channel::Subsurface => "subsurface",
            Channel::Opacity => "opacity",
            Channel::Translucency => "translucency",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Channel {
    type Err = Error;

    /// Accepts either the config key or the label, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        Channel::ALL
            .into_iter()
            .find(|c| c.key() == wanted || c.label().to_lowercase() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown channel: {}", s)))
    }
}
