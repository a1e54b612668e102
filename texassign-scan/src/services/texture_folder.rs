//! Texture folder
//!
//! Holds the folder currently being inspected together with the fields of
//! one preset. Scanning fills each field's ordered candidates; assigning
//! picks the top candidate; a manual override can replace any choice.

use crate::models::assignment::Assignment;
use crate::models::preset::Preset;
use crate::services::channel_classifier::ChannelClassifier;
use crate::services::file_scanner::FileScanner;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use texassign_common::{Channel, Error, Result};

/// State of one preset field for the current folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSlot {
    pub title: String,
    pub channel: Channel,
    /// Ordered candidates from the last scan, most preferred first
    pub candidates: Vec<String>,
    /// Chosen filename, relative to the folder
    pub texture: Option<String>,
}

/// Folder of textures bound to a preset
#[derive(Debug, Clone)]
pub struct TextureFolder {
    preset: Preset,
    folder_path: Option<PathBuf>,
    textures: Vec<String>,
    fields: Vec<FieldSlot>,
}

impl TextureFolder {
    pub fn new(preset: Preset) -> Self {
        let fields = preset
            .fields
            .iter()
            .map(|f| FieldSlot {
                title: f.title.clone(),
                channel: f.rule.channel,
                candidates: Vec::new(),
                texture: None,
            })
            .collect();

        Self {
            preset,
            folder_path: None,
            textures: Vec::new(),
            fields,
        }
    }

    /// Point at a new folder; previous scan results and choices are dropped
    pub fn set_folder_path(&mut self, path: impl Into<PathBuf>) {
        self.folder_path = Some(path.into());
        self.textures.clear();
        for field in &mut self.fields {
            field.candidates.clear();
            field.texture = None;
        }
    }

    pub fn folder_path(&self) -> Option<&Path> {
        self.folder_path.as_deref()
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    /// Scan the folder and rank candidates for every field
    ///
    /// A folder that is unset, missing or unreadable yields no textures.
    pub fn find_textures(&mut self, scanner: &FileScanner) {
        self.textures = match &self.folder_path {
            Some(path) => match scanner.list_textures(path) {
                Ok(names) => names,
                Err(e) => {
                    tracing::warn!("No textures loaded: {}", e);
                    Vec::new()
                }
            },
            None => {
                tracing::warn!("No folder set, nothing to scan");
                Vec::new()
            }
        };

        let matches = ChannelClassifier::classify(&self.preset.fields, &self.textures);
        for (field, found) in self.fields.iter_mut().zip(matches) {
            field.candidates = found.candidates;
        }

        tracing::debug!(
            preset = %self.preset.kind,
            textures = self.textures.len(),
            "Ranked folder textures"
        );
    }

    /// Texture filenames found by the last scan
    pub fn textures(&self) -> &[String] {
        &self.textures
    }

    /// Give every field its top candidate
    pub fn assign_to_fields(&mut self) {
        for field in &mut self.fields {
            field.texture = field.candidates.first().cloned();
            match &field.texture {
                Some(name) => tracing::debug!("{} -> {}", field.title, name),
                None => tracing::debug!("{} -> (none)", field.title),
            }
        }
    }

    /// Clear every field's texture, keeping the candidates
    pub fn reinit_fields(&mut self) {
        for field in &mut self.fields {
            field.texture = None;
        }
    }

    /// True when no field holds a texture
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|f| f.texture.is_none())
    }

    /// Manually set or clear the texture of the field titled `title`
    ///
    /// The name is kept only if it names an existing file directly in the
    /// folder; anything else (missing file, absolute path, `..`, subfolder)
    /// clears the field.
    pub fn set_texture(&mut self, title: &str, name: Option<&str>) -> Result<()> {
        let folder = self.folder_path.clone();
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.title.eq_ignore_ascii_case(title))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown field '{}'", title)))?;

        field.texture = match (name, folder) {
            (Some(name), Some(folder)) if is_bare_file_name(name) && folder.join(name).is_file() => {
                Some(name.to_string())
            }
            (Some(name), _) => {
                tracing::warn!("{}: '{}' is not a file in the folder, clearing", field.title, name);
                None
            }
            (None, _) => None,
        };
        Ok(())
    }

    pub fn fields(&self) -> &[FieldSlot] {
        &self.fields
    }

    /// Full paths of the chosen textures, by channel
    pub fn assignment(&self) -> Assignment {
        let mut assignment = Assignment::new();
        let Some(folder) = &self.folder_path else {
            return assignment;
        };
        for field in &self.fields {
            if let Some(name) = &field.texture {
                assignment.insert(field.channel, folder.join(name));
            }
        }
        assignment
    }
}

/// A single plain path component: no root, no `..`, no separator
fn is_bare_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::preset::PresetKind;
    use std::fs;
    use tempfile::TempDir;

    fn folder_with(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        dir
    }

    #[test]
    fn test_unset_folder_yields_nothing() {
        let mut folder = TextureFolder::new(Preset::new(PresetKind::Standard).unwrap());
        folder.find_textures(&FileScanner::new());
        folder.assign_to_fields();
        assert!(folder.textures().is_empty());
        assert!(folder.is_empty());
        assert!(folder.assignment().is_empty());
    }

    #[test]
    fn test_assign_and_reinit() {
        let dir = folder_with(&["rock_Albedo.jpg", "rock_Albedo.exr", "rock_Roughness.jpg"]);
        let mut folder = TextureFolder::new(Preset::new(PresetKind::Megascan3d).unwrap());
        folder.set_folder_path(dir.path());
        folder.find_textures(&FileScanner::new());
        folder.assign_to_fields();

        let albedo = &folder.fields()[0];
        assert_eq!(albedo.texture.as_deref(), Some("rock_Albedo.exr"));
        assert_eq!(albedo.candidates, vec!["rock_Albedo.exr", "rock_Albedo.jpg"]);
        assert!(!folder.is_empty());

        folder.reinit_fields();
        assert!(folder.is_empty());
        assert_eq!(folder.fields()[0].candidates.len(), 2);
    }

    #[test]
    fn test_bare_file_name() {
        assert!(is_bare_file_name("a_Roughness.exr"));
        assert!(!is_bare_file_name("/tmp/a_Roughness.exr"));
        assert!(!is_bare_file_name("../other/a_Roughness.exr"));
        assert!(!is_bare_file_name("sub/a_Roughness.exr"));
        assert!(!is_bare_file_name(".."));
        assert!(!is_bare_file_name(""));
    }

    #[test]
    fn test_set_texture_unknown_title() {
        let mut folder = TextureFolder::new(Preset::new(PresetKind::Standard).unwrap());
        assert!(matches!(
            folder.set_texture("Sheen", Some("a.exr")),
            Err(Error::InvalidInput(_))
        ));
    }
}
