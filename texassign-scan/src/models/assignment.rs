//! Channel to texture assignment

use serde::Serialize;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use texassign_common::Channel;

/// `channel → texture path` mapping handed to shading network construction
///
/// Iterates in channel wiring order. Channels without a texture are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Assignment(BTreeMap<Channel, PathBuf>);

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `path` to `channel`, replacing any previous texture
    pub fn insert(&mut self, channel: Channel, path: impl Into<PathBuf>) {
        self.0.insert(channel, path.into());
    }

    pub fn get(&self, channel: Channel) -> Option<&Path> {
        self.0.get(&channel).map(PathBuf::as_path)
    }

    pub fn contains(&self, channel: Channel) -> bool {
        self.0.contains_key(&channel)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Channel, PathBuf> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = (&'a Channel, &'a PathBuf);
    type IntoIter = btree_map::Iter<'a, Channel, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterates_in_wiring_order() {
        let mut assignment = Assignment::new();
        assignment.insert(Channel::Roughness, "/t/r.exr");
        assignment.insert(Channel::BaseColor, "/t/a.exr");
        assignment.insert(Channel::Normal, "/t/n.exr");

        let channels: Vec<_> = assignment.iter().map(|(c, _)| *c).collect();
        assert_eq!(channels, vec![Channel::BaseColor, Channel::Normal, Channel::Roughness]);
    }

    #[test]
    fn test_serializes_as_map() {
        let mut assignment = Assignment::new();
        assignment.insert(Channel::BaseColor, "/t/a.exr");
        let json = serde_json::to_value(&assignment).unwrap();
        assert_eq!(json["base_color"], "/t/a.exr");
    }
}
