//! Texture file scanner
//!
//! Lists the texture files of one folder (non-recursive) and the texture
//! folders below a root. Output is always sorted by name: directory order
//! is filesystem-dependent and the classifier must see a stable input.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use texassign_common::config::ScanConfig;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Texture scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Cannot access file or directory
    #[error("File access error {0}: {1}")]
    FileAccessError(PathBuf, String),
}

/// Texture file scanner
#[derive(Debug, Clone)]
pub struct FileScanner {
    extensions: HashSet<String>,
    ignore_patterns: Vec<String>,
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FileScanner {
    /// Create new file scanner with the default extensions and ignore patterns
    pub fn new() -> Self {
        Self::from_config(&ScanConfig::default())
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            ignore_patterns: config.ignore_patterns.clone(),
        }
    }

    /// Names of the texture files directly inside `dir`, sorted ascending
    pub fn list_textures(&self, dir: &Path) -> Result<Vec<String>, ScanError> {
        check_directory(dir)?;

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e));

        let mut names = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // The folder itself cannot be read
                Err(e) if e.depth() == 0 => {
                    return Err(ScanError::FileAccessError(dir.to_path_buf(), e.to_string()));
                }
                Err(e) => {
                    tracing::warn!("Error accessing entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!("Skipping non UTF-8 file name in {}", dir.display());
                continue;
            };

            if self.is_texture_name(&name) {
                names.push(name);
            }
        }

        tracing::debug!("{} textures found in {}", names.len(), dir.display());
        Ok(names)
    }

    /// Immediate subdirectories of `root`, sorted by name
    pub fn texture_folders(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        check_directory(root)?;

        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e));

        let mut folders = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_dir() {
                        folders.push(entry.into_path());
                    }
                }
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    // Continue scanning, don't abort
                }
            }
        }
        Ok(folders)
    }

    /// Whether `name` carries a supported texture extension
    pub fn is_texture_name(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .map(|ext| self.extensions.contains(&ext.to_string_lossy().to_lowercase()))
            .unwrap_or(false)
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignore_patterns.iter().any(|p| name.contains(p.as_str()))
    }

    fn should_process_entry(&self, entry: &DirEntry) -> bool {
        !self.is_ignored(&entry.file_name().to_string_lossy())
    }
}

fn check_directory(path: &Path) -> Result<(), ScanError> {
    if !path.exists() {
        return Err(ScanError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(ScanError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_texture_extension_detection() {
        let scanner = FileScanner::new();
        assert!(scanner.is_texture_name("rock_BaseColor.exr"));
        assert!(scanner.is_texture_name("rock_BaseColor.JPG"));
        assert!(scanner.is_texture_name("rock.tx"));
        assert!(!scanner.is_texture_name("rock.txt"));
        assert!(!scanner.is_texture_name("exr"));
    }

    #[test]
    fn test_scan_nonexistent_path() {
        let scanner = FileScanner::new();
        let result = scanner.list_textures(Path::new("/nonexistent/path"));
        match result.unwrap_err() {
            ScanError::PathNotFound(_) => {}
            other => panic!("Expected PathNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_file_as_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("rock_Albedo.jpg");
        fs::write(&file, b"").unwrap();

        let scanner = FileScanner::new();
        match scanner.list_textures(&file).unwrap_err() {
            ScanError::NotADirectory(_) => {}
            other => panic!("Expected NotADirectory error, got {:?}", other),
        }
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b_Normal.exr", "a_Albedo.jpg", "notes.txt", "Thumbs.db"] {
            fs::write(temp_dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(temp_dir.path().join("sub.exr")).unwrap();

        let scanner = FileScanner::new();
        let names = scanner.list_textures(temp_dir.path()).unwrap();
        assert_eq!(names, vec!["a_Albedo.jpg", "b_Normal.exr"]);
    }

    #[test]
    fn test_list_ignores_patterns_and_nested_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("sub").join("deep_Albedo.exr"), b"").unwrap();
        fs::write(temp_dir.path().join("c_Roughness.exr"), b"").unwrap();
        fs::write(temp_dir.path().join(".DS_Store.png"), b"").unwrap();

        let scanner = FileScanner::new();
        assert_eq!(scanner.list_textures(temp_dir.path()).unwrap(), vec!["c_Roughness.exr"]);
    }

    #[test]
    fn test_custom_extensions() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["a.exr", "a.png"] {
            fs::write(temp_dir.path().join(name), b"").unwrap();
        }

        let config = ScanConfig {
            extensions: vec![".PNG".to_string()],
            ..ScanConfig::default()
        };
        let scanner = FileScanner::from_config(&config);
        assert_eq!(scanner.list_textures(temp_dir.path()).unwrap(), vec!["a.png"]);
    }

    #[test]
    fn test_texture_folders_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["02", "01", ".git"] {
            fs::create_dir(temp_dir.path().join(name)).unwrap();
        }
        fs::write(temp_dir.path().join("loose.exr"), b"").unwrap();

        let scanner = FileScanner::new();
        let folders = scanner.texture_folders(temp_dir.path()).unwrap();
        let names: Vec<_> = folders
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["01", "02"]);
    }
}
