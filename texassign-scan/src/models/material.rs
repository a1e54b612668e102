//! Material detected in a texture folder

use crate::models::assignment::Assignment;
use serde::Serialize;
use std::path::PathBuf;

/// One material: a title, the folder its textures live in, and its assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Material {
    pub title: String,
    pub folder: PathBuf,
    pub assignment: Assignment,
    /// Disabled materials are listed but not turned into shading networks
    pub enabled: bool,
}

impl Material {
    pub fn new(title: impl Into<String>, folder: impl Into<PathBuf>, assignment: Assignment) -> Self {
        Self {
            title: title.into(),
            folder: folder.into(),
            assignment,
            enabled: true,
        }
    }
}
