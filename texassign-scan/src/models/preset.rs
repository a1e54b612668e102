//! Asset presets
//!
//! A preset selects the fields shown for a texture folder and the matching
//! rule of each field. The kinds mirror the texture layouts of common asset
//! sources:
//! - `standard`: every channel, broad keywords
//! - `substance`: Substance exports (displacement is the `Height` map)
//! - `megascan3d`: Megascans 3D assets (`Displacement` map)
//! - `megascan3d_plant`: Megascans plants (no displacement, adds opacity and translucency)

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use texassign_common::{Channel, ChannelRule, Error, Result, TieBreak};

/// Asset kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetKind {
    Standard,
    Substance,
    Megascan3d,
    Megascan3dPlant,
}

impl PresetKind {
    pub const ALL: [PresetKind; 4] = [
        PresetKind::Standard,
        PresetKind::Substance,
        PresetKind::Megascan3d,
        PresetKind::Megascan3dPlant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetKind::Standard => "standard",
            PresetKind::Substance => "substance",
            PresetKind::Megascan3d => "megascan3d",
            PresetKind::Megascan3dPlant => "megascan3d_plant",
        }
    }
}

impl fmt::Display for PresetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        PresetKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Unknown preset '{}' (expected one of: standard, substance, megascan3d, megascan3d_plant)",
                    s
                ))
            })
    }
}

/// One titled slot of a preset
#[derive(Debug, Clone)]
pub struct PresetField {
    pub title: String,
    pub rule: ChannelRule,
}

impl PresetField {
    fn new(title: &str, rule: ChannelRule) -> Self {
        Self {
            title: title.to_string(),
            rule,
        }
    }
}

/// Fields and rules of one asset kind
#[derive(Debug, Clone)]
pub struct Preset {
    pub kind: PresetKind,
    pub fields: Vec<PresetField>,
}

impl Preset {
    /// Build a preset with its default rules
    pub fn new(kind: PresetKind) -> Result<Self> {
        use Channel::*;

        let fields = match kind {
            PresetKind::Standard => vec![
                PresetField::new("BaseColor", default_rule(BaseColor)?),
                PresetField::new("Normal", default_rule(Normal)?),
                PresetField::new("Displacement", default_rule(Displacement)?),
                PresetField::new("Roughness", default_rule(Roughness)?),
                PresetField::new("Metalness", default_rule(Metalness)?),
                PresetField::new("Emissive", default_rule(Emissive)?),
                PresetField::new("Subsurface", default_rule(Subsurface)?),
                PresetField::new("Opacity", default_rule(Opacity)?),
            ],
            PresetKind::Substance => vec![
                PresetField::new("Albedo", default_rule(BaseColor)?),
                PresetField::new("Normal", default_rule(Normal)?),
                PresetField::new(
                    "Displace",
                    with_format_rules(ChannelRule::new(Displacement, "height")?)?,
                ),
                PresetField::new("Roughness", default_rule(Roughness)?),
                PresetField::new("Metalness", default_rule(Metalness)?),
            ],
            PresetKind::Megascan3d => vec![
                PresetField::new("Albedo", default_rule(BaseColor)?),
                PresetField::new("Normal", default_rule(Normal)?),
                PresetField::new(
                    "Displacement",
                    with_format_rules(ChannelRule::new(Displacement, "displacement")?)?,
                ),
                PresetField::new("Roughness", default_rule(Roughness)?),
                PresetField::new("Metalness", default_rule(Metalness)?),
            ],
            PresetKind::Megascan3dPlant => vec![
                PresetField::new("Albedo", default_rule(BaseColor)?),
                PresetField::new("Normal", default_rule(Normal)?),
                // Plant scans ship a displacement map that must not be wired
                PresetField::new("Displacement", ChannelRule::disabled(Displacement)),
                PresetField::new("Roughness", default_rule(Roughness)?),
                PresetField::new("Metalness", default_rule(Metalness)?),
                PresetField::new("Opacity", default_rule(Opacity)?),
                PresetField::new("Translucency", default_rule(Translucency)?),
            ],
        };

        Ok(Self { kind, fields })
    }

    /// Replace the rule of every field whose channel has an override
    pub fn apply_overrides(&mut self, overrides: &[ChannelRule]) {
        for field in &mut self.fields {
            if let Some(rule) = overrides.iter().rev().find(|r| r.channel == field.rule.channel) {
                tracing::debug!(
                    preset = %self.kind,
                    field = %field.title,
                    "Using configured rule override"
                );
                field.rule = rule.clone();
            }
        }
    }

    /// Field by title, case-insensitively
    pub fn field(&self, title: &str) -> Option<&PresetField> {
        self.fields.iter().find(|f| f.title.eq_ignore_ascii_case(title))
    }
}

/// Filename keywords identifying a channel, as a regex alternation
pub fn channel_keywords(channel: Channel) -> &'static str {
    match channel {
        Channel::BaseColor => "basecolor|albedo|diffuse",
        Channel::Normal => "normal",
        Channel::Roughness => "roughness",
        Channel::Metalness => "metalness|metallic",
        Channel::Displacement => "height|displacement|disp",
        Channel::Emissive => "emissive|emission",
        Channel::Subsurface => "subsurface|sss",
        Channel::Opacity => "opacity",
        Channel::Translucency => "translucency",
    }
}

/// Names containing this are never a channel's own map (e.g. `NormalCombine`)
pub fn channel_exclude(channel: Channel) -> Option<&'static str> {
    match channel {
        Channel::Normal => Some("combine"),
        _ => None,
    }
}

/// Default rule of a channel
pub fn default_rule(channel: Channel) -> Result<ChannelRule> {
    let mut rule = ChannelRule::new(channel, channel_keywords(channel))?;
    if let Some(exclude) = channel_exclude(channel) {
        rule = rule.with_exclude(exclude)?;
    }
    if matches!(channel, Channel::BaseColor | Channel::Normal) {
        rule = with_lod_rules(rule)?;
    }
    with_format_rules(rule)
}

/// Prefer EXR, then JPG, then anything else
fn with_format_rules(rule: ChannelRule) -> Result<ChannelRule> {
    Ok(rule.with_primary_rules(vec![
        TieBreak::present(r".*\.exr")?,
        TieBreak::present(r".*\.jpg")?,
    ]))
}

/// Prefer names without a LOD suffix, then the lowest LOD
fn with_lod_rules(rule: ChannelRule) -> Result<ChannelRule> {
    Ok(rule.with_secondary_rules(vec![
        TieBreak::absent(r"LOD\d")?,
        TieBreak::ascending(r"LOD(\d+)")?,
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_builds() {
        for kind in PresetKind::ALL {
            let preset = Preset::new(kind).unwrap();
            assert!(!preset.fields.is_empty(), "{} has no fields", kind);
        }
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("substance".parse::<PresetKind>().unwrap(), PresetKind::Substance);
        assert_eq!("Megascan3D-Plant".parse::<PresetKind>().unwrap(), PresetKind::Megascan3dPlant);
        assert!("unreal".parse::<PresetKind>().is_err());
    }

    #[test]
    fn test_substance_displacement_is_height() {
        let preset = Preset::new(PresetKind::Substance).unwrap();
        let field = preset.field("displace").unwrap();
        assert!(field.rule.is_candidate("wood_Height.exr"));
        assert!(!field.rule.is_candidate("wood_Displacement.exr"));
    }

    #[test]
    fn test_plant_displacement_disabled() {
        let preset = Preset::new(PresetKind::Megascan3dPlant).unwrap();
        let field = preset.field("Displacement").unwrap();
        assert!(!field.rule.is_enabled());
        assert!(preset.field("Translucency").is_some());
    }

    #[test]
    fn test_normal_excludes_combined_maps() {
        let rule = default_rule(Channel::Normal).unwrap();
        assert!(rule.is_candidate("rock_Normal_LOD0.jpg"));
        assert!(!rule.is_candidate("rock_NormalCombine.jpg"));
    }

    #[test]
    fn test_overrides_replace_matching_channel() {
        let mut preset = Preset::new(PresetKind::Substance).unwrap();
        let custom = ChannelRule::new(Channel::Roughness, "gloss").unwrap();
        preset.apply_overrides(&[custom]);

        let field = preset.field("Roughness").unwrap();
        assert!(field.rule.is_candidate("wood_Gloss.exr"));
        assert!(!field.rule.is_candidate("wood_Roughness.exr"));
        // Other fields untouched
        assert!(preset.field("Albedo").unwrap().rule.is_candidate("wood_Albedo.exr"));
    }
}
