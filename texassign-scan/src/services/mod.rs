//! Folder scanning and classification services

pub mod channel_classifier;
pub mod file_scanner;
pub mod folder_batch;
pub mod material_grouper;
pub mod texture_folder;

pub use channel_classifier::{ChannelClassifier, FieldMatches};
pub use file_scanner::{FileScanner, ScanError};
pub use folder_batch::FolderBatch;
pub use material_grouper::MaterialGrouper;
pub use texture_folder::{FieldSlot, TextureFolder};
