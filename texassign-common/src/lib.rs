//! # texassign Common Library
//!
//! Shared code for the texassign crates:
//! - Shader channel definitions
//! - Channel matching rules (compiled and serialisable forms)
//! - Configuration loading
//! - Error types

pub mod channel;
pub mod config;
pub mod error;
pub mod rules;

pub use channel::Channel;
pub use error::{Error, Result};
pub use rules::{ChannelRule, ChannelRuleSpec, RuleSpec, SortOrder, TieBreak};
