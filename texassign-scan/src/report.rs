//! Plain-text reports printed by the CLI

use crate::models::material::Material;
use crate::models::preset::Preset;
use crate::services::texture_folder::FieldSlot;
use std::fmt::Write;
use std::path::Path;

const NONE: &str = "(none)";

/// Chosen texture and ranked candidates of every field
pub fn render_fields(folder: &Path, preset: &Preset, fields: &[FieldSlot]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", folder.display(), preset.kind);

    let width = fields.iter().map(|f| f.title.len()).max().unwrap_or(0);
    for field in fields {
        let chosen = field.texture.as_deref().unwrap_or(NONE);
        let _ = writeln!(out, "  {:<width$}  {}", field.title, chosen, width = width);
        // Runners-up, in rank order
        for candidate in field.candidates.iter().skip(1) {
            let _ = writeln!(out, "  {:<width$}    {}", "", candidate, width = width);
        }
    }
    out
}

/// Materials with their channel assignment
pub fn render_materials(materials: &[Material]) -> String {
    if materials.is_empty() {
        return format!("{}\n", NONE);
    }

    let mut out = String::new();
    for material in materials {
        let state = if material.enabled { "" } else { " (disabled)" };
        let _ = writeln!(out, "{}{}  {}", material.title, state, material.folder.display());
        for (channel, path) in &material.assignment {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            let _ = writeln!(out, "  {:<13} {}", channel.label(), name);
        }
    }
    out
}

/// Effective matching rules of a preset
pub fn render_rules(preset: &Preset) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "preset {}", preset.kind);
    for field in &preset.fields {
        let rule = &field.rule;
        match rule.pattern() {
            Some(pattern) => {
                let _ = writeln!(out, "  {} ({}): /{}/", field.title, rule.channel.key(), pattern);
            }
            None => {
                let _ = writeln!(out, "  {} ({}): disabled", field.title, rule.channel.key());
                continue;
            }
        }
        if let Some(exclude) = rule.exclude_pattern() {
            let _ = writeln!(out, "    exclude /{}/", exclude);
        }
        for tie_break in &rule.primary_rules {
            let _ = writeln!(out, "    primary   {}", tie_break);
        }
        for tie_break in &rule.secondary_rules {
            let _ = writeln!(out, "    secondary {}", tie_break);
        }
    }
    out
}
