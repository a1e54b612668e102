//! Batch of texture folders
//!
//! Loads every immediate subdirectory of a root as one or more materials.

use crate::models::material::Material;
use crate::services::file_scanner::FileScanner;
use crate::services::material_grouper::MaterialGrouper;
use std::path::Path;

/// Materials of every subfolder of a root
#[derive(Debug, Clone, Default)]
pub struct FolderBatch {
    materials: Vec<Material>,
}

impl FolderBatch {
    /// Group the textures of each subfolder of `root`, titled by the
    /// subfolder name
    ///
    /// A missing root, or a subfolder that cannot be listed, contributes
    /// nothing.
    pub fn load(root: &Path, scanner: &FileScanner, grouper: &MaterialGrouper) -> Self {
        let folders = match scanner.texture_folders(root) {
            Ok(folders) => folders,
            Err(e) => {
                tracing::warn!("Batch root skipped: {}", e);
                return Self::default();
            }
        };

        let mut materials = Vec::new();
        for folder in folders {
            let names = match scanner.list_textures(&folder) {
                Ok(names) => names,
                Err(e) => {
                    tracing::warn!("Folder skipped: {}", e);
                    continue;
                }
            };
            let title = folder
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            materials.extend(grouper.group(&title, &folder, &names));
        }

        tracing::info!(
            root = %root.display(),
            materials = materials.len(),
            "Batch loaded"
        );

        Self { materials }
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Materials still enabled
    pub fn enabled(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter().filter(|m| m.enabled)
    }

    /// Disable every material titled `title`; false if none matched
    pub fn disable(&mut self, title: &str) -> bool {
        let mut found = false;
        for material in self.materials.iter_mut().filter(|m| m.title == title) {
            material.enabled = false;
            found = true;
        }
        if !found {
            tracing::warn!("No material titled '{}' to disable", title);
        }
        found
    }
}
