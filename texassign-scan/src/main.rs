//! texassign - PBR texture folder channel classifier
//!
//! Scans material folders, ranks texture files per shader channel and
//! prints the resulting assignment, material groups or shading network.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::util::SubscriberInitExt;

use texassign_common::config::{write_toml_config, ConfigResolver, TomlConfig, CONFIG_ENV_VAR};
use texassign_scan::logging::{self, LevelSource};
use texassign_scan::models::{Preset, PresetKind, ShadingNetwork};
use texassign_scan::report;
use texassign_scan::services::{FileScanner, FolderBatch, MaterialGrouper, TextureFolder};

/// Command-line arguments for texassign
#[derive(Parser, Debug)]
#[command(name = "texassign")]
#[command(about = "Assign PBR texture files to shader channels")]
#[command(version)]
struct Args {
    /// Config file (overrides the per-user config)
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank and assign the textures of one folder
    Assign {
        folder: PathBuf,
        /// standard, substance, megascan3d or megascan3d_plant
        #[arg(short, long)]
        preset: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Split one folder into materials by filename prefix
    Groups {
        folder: PathBuf,
        /// Title used when the folder holds a single material
        #[arg(short, long)]
        title: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Load the materials of every subfolder of a root
    Batch {
        root: PathBuf,
        /// Material to leave out (repeatable)
        #[arg(long = "disable")]
        disabled: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Print the shading network for one folder as JSON
    Plan {
        folder: PathBuf,
        #[arg(short, long)]
        preset: Option<String>,
        /// Material name (defaults to the folder name)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Print the effective matching rules
    Rules {
        #[arg(short, long)]
        preset: Option<String>,
    },
    /// Write the default configuration to a file
    InitConfig { path: PathBuf },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Tracing first: config resolution logs its own fallbacks
    let rust_log = std::env::var("RUST_LOG").ok();
    let level_source = LevelSource::detect(rust_log.as_deref(), args.verbose);
    let (subscriber, filter_handle) =
        logging::subscriber(logging::startup_filter(level_source), std::io::stderr);
    subscriber.init();

    info!(
        "texassign v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = ConfigResolver::new(args.config.clone())
        .resolve()
        .context("Failed to load configuration")?;
    logging::apply_config_level(&filter_handle, level_source, &config.logging.level);

    let scanner = FileScanner::from_config(&config.scan);

    match args.command {
        Command::Assign { folder, preset, json } => {
            let preset = load_preset(&config, preset.as_deref())?;
            let texture_folder = scan_folder(&folder, preset, &scanner);
            if json {
                print_json(&texture_folder.fields())?;
            } else {
                print!(
                    "{}",
                    report::render_fields(&folder, texture_folder.preset(), texture_folder.fields())
                );
            }
            info!(
                "{} of {} fields assigned",
                texture_folder.assignment().len(),
                texture_folder.fields().len()
            );
        }
        Command::Groups { folder, title, json } => {
            let grouper = MaterialGrouper::new(&config.scan.extensions)?;
            let names = match scanner.list_textures(&folder) {
                Ok(names) => names,
                Err(e) => {
                    tracing::warn!("No textures loaded: {}", e);
                    Vec::new()
                }
            };
            let title = title.unwrap_or_else(|| folder_title(&folder));
            let materials = grouper.group(&title, &folder, &names);
            if json {
                print_json(&materials)?;
            } else {
                print!("{}", report::render_materials(&materials));
            }
        }
        Command::Batch { root, disabled, json } => {
            let grouper = MaterialGrouper::new(&config.scan.extensions)?;
            let mut batch = FolderBatch::load(&root, &scanner, &grouper);
            for title in &disabled {
                batch.disable(title);
            }
            if json {
                print_json(&batch.materials())?;
            } else {
                print!("{}", report::render_materials(batch.materials()));
            }
            info!("{} materials enabled", batch.enabled().count());
        }
        Command::Plan { folder, preset, name } => {
            let preset = load_preset(&config, preset.as_deref())?;
            let texture_folder = scan_folder(&folder, preset, &scanner);
            let name = name.unwrap_or_else(|| folder_title(&folder));
            let network = ShadingNetwork::from_assignment(&name, &texture_folder.assignment());
            print_json(&network)?;
        }
        Command::Rules { preset } => {
            let preset = load_preset(&config, preset.as_deref())?;
            print!("{}", report::render_rules(&preset));
        }
        Command::InitConfig { path } => {
            write_toml_config(&TomlConfig::default(), &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Default configuration written to {}", path.display());
        }
    }

    Ok(())
}

/// Preset named on the command line (or configured), with rule overrides applied
fn load_preset(config: &TomlConfig, name: Option<&str>) -> Result<Preset> {
    let kind: PresetKind = name
        .unwrap_or(&config.scan.default_preset)
        .parse()
        .context("Invalid preset")?;
    let mut preset = Preset::new(kind)?;
    preset.apply_overrides(&config.channel_overrides()?);
    Ok(preset)
}

fn scan_folder(folder: &Path, preset: Preset, scanner: &FileScanner) -> TextureFolder {
    let mut texture_folder = TextureFolder::new(preset);
    texture_folder.set_folder_path(folder);
    texture_folder.find_textures(scanner);
    texture_folder.assign_to_fields();
    texture_folder
}

fn folder_title(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "material".to_string())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
