//! Material grouper
//!
//! Detects several materials sharing one folder. Each grouping rule captures
//! the filename prefix in front of a channel keyword; distinct prefixes mean
//! distinct materials:
//!
//! ```text
//! brick_BaseColor.exr  ─┐
//! brick_Normal.exr     ─┴─ "brick"
//! tile_Albedo.jpg      ─┬─ "tile"
//! tile_Roughness.jpg   ─┘
//! ```
//!
//! Within a material, a channel takes the first filename in descending name
//! order.

use crate::models::assignment::Assignment;
use crate::models::material::Material;
use crate::models::preset::{channel_exclude, channel_keywords};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use texassign_common::rules::compile_pattern;
use texassign_common::{Channel, Result};

/// Channels used for grouping, in the order files are recorded
const GROUPING_CHANNELS: [Channel; 5] = [
    Channel::BaseColor,
    Channel::Normal,
    Channel::Displacement,
    Channel::Roughness,
    Channel::Metalness,
];

struct GroupingRule {
    channel: Channel,
    pattern: Regex,
    exclude: Option<Regex>,
}

impl GroupingRule {
    /// Prefix captured in front of the channel keyword
    fn prefix<'n>(&self, name: &'n str) -> Option<&'n str> {
        if self.exclude.as_ref().is_some_and(|e| e.is_match(name)) {
            return None;
        }
        self.pattern
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Files recorded for one prefix
#[derive(Default)]
struct PrefixGroup<'n> {
    /// Prefix as written in the first filename that produced it
    display: &'n str,
    files: BTreeMap<Channel, Vec<&'n str>>,
}

/// Splits a folder's textures into materials by filename prefix
pub struct MaterialGrouper {
    rules: Vec<GroupingRule>,
}

impl MaterialGrouper {
    /// Grouper recognising filenames with one of `extensions`
    pub fn new(extensions: &[String]) -> Result<Self> {
        let extensions = extensions
            .iter()
            .map(|e| regex::escape(e.trim_start_matches('.')))
            .collect::<Vec<_>>()
            .join("|");

        let rules = GROUPING_CHANNELS
            .into_iter()
            .map(|channel| {
                let pattern = compile_pattern(&format!(
                    r"^(.*)(?:{}).*\.(?:{})$",
                    channel_keywords(channel),
                    extensions
                ))?;
                let exclude = channel_exclude(channel).map(compile_pattern).transpose()?;
                Ok(GroupingRule {
                    channel,
                    pattern,
                    exclude,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Materials found among `names` in `folder`
    ///
    /// A single prefix gives one material titled `title`, unless `title`
    /// starts with a digit (a numbered download folder), in which case the
    /// prefix names it. Several prefixes give one material per prefix.
    pub fn group<S: AsRef<str>>(&self, title: &str, folder: &Path, names: &[S]) -> Vec<Material> {
        let mut sorted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        let mut groups: BTreeMap<String, PrefixGroup> = BTreeMap::new();
        for rule in &self.rules {
            for &name in &sorted {
                let Some(prefix) = rule.prefix(name) else {
                    continue;
                };
                let group = groups.entry(prefix.to_lowercase()).or_insert_with(|| PrefixGroup {
                    display: prefix,
                    ..PrefixGroup::default()
                });
                group.files.entry(rule.channel).or_default().push(name);
            }
        }

        let materials: Vec<Material> = match groups.len() {
            0 => Vec::new(),
            1 => groups
                .into_values()
                .map(|group| {
                    let starts_with_digit =
                        title.chars().next().is_some_and(|c| c.is_ascii_digit());
                    let title = if starts_with_digit {
                        title_from_prefix(group.display, title)
                    } else {
                        title.to_string()
                    };
                    build_material(title, folder, &group)
                })
                .collect(),
            _ => groups
                .into_values()
                .map(|group| build_material(title_from_prefix(group.display, title), folder, &group))
                .collect(),
        };

        tracing::debug!(
            folder = %folder.display(),
            materials = materials.len(),
            "Grouped folder textures"
        );

        materials
    }
}

fn build_material(title: String, folder: &Path, group: &PrefixGroup) -> Material {
    let mut assignment = Assignment::new();
    for (channel, files) in &group.files {
        if let Some(first) = files.first() {
            assignment.insert(*channel, folder.join(first));
        }
    }
    Material::new(title, folder, assignment)
}

/// Prefix without its trailing separators, or `fallback` if nothing is left
fn title_from_prefix(prefix: &str, fallback: &str) -> String {
    let trimmed = prefix.trim_end_matches(['_', '-', ' ', '.']);
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouper() -> MaterialGrouper {
        MaterialGrouper::new(&["exr".to_string(), "jpg".to_string()]).unwrap()
    }

    #[test]
    fn test_title_from_prefix() {
        assert_eq!(title_from_prefix("brick_", "x"), "brick");
        assert_eq!(title_from_prefix("brick-", "x"), "brick");
        assert_eq!(title_from_prefix("", "x"), "x");
        assert_eq!(title_from_prefix("_", "x"), "x");
    }

    #[test]
    fn test_no_match_no_material() {
        let names = ["readme.exr", "preview.jpg"];
        assert!(grouper().group("rock", Path::new("/t"), &names).is_empty());
    }

    #[test]
    fn test_single_prefix_keeps_title() {
        let names = ["rock_Albedo.exr", "rock_Normal.exr"];
        let materials = grouper().group("Cliff", Path::new("/t"), &names);
        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0].title, "Cliff");
        assert_eq!(
            materials[0].assignment.get(Channel::BaseColor),
            Some(Path::new("/t/rock_Albedo.exr"))
        );
    }

    #[test]
    fn test_numbered_title_replaced_by_prefix() {
        let names = ["Rock_Albedo.exr"];
        let materials = grouper().group("0042", Path::new("/t"), &names);
        assert_eq!(materials[0].title, "Rock");
    }

    #[test]
    fn test_normal_combine_ignored() {
        let names = ["rock_NormalCombine.exr"];
        assert!(grouper().group("rock", Path::new("/t"), &names).is_empty());
    }

    #[test]
    fn test_metallic_grouped_like_metalness() {
        let names = ["steel_BaseColor.exr", "steel_Metallic.exr"];
        let materials = grouper().group("steel", Path::new("/t"), &names);
        assert_eq!(
            materials[0].assignment.get(Channel::Metalness),
            Some(Path::new("/t/steel_Metallic.exr"))
        );
    }

    #[test]
    fn test_unknown_extension_ignored() {
        let names = ["rock_Albedo.png"];
        assert!(grouper().group("rock", Path::new("/t"), &names).is_empty());
    }
}
