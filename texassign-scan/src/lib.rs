//! texassign library interface
//!
//! Classifies the texture files of a PBR material folder into shader
//! channels. Filenames go in; ranked candidates per channel, a
//! `channel → path` assignment and a shading network description come out.
//!
//! - [`services::ChannelClassifier`]: rule-based ranking of filenames for one channel
//! - [`services::TextureFolder`]: one folder bound to a preset
//! - [`services::MaterialGrouper`] / [`services::FolderBatch`]: several materials per folder, several folders per root
//! - [`models::ShadingNetwork`]: host-independent node graph for an assignment

pub mod logging;
pub mod models;
pub mod report;
pub mod services;

pub use texassign_common::{Channel, Error, Result};
