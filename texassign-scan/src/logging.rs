//! Tracing setup
//!
//! The subscriber is installed before the config file is read, so config
//! resolution warnings reach stderr. Its filter sits behind a reload layer:
//! once the config is loaded, `[logging] level` replaces the startup level
//! unless `RUST_LOG` or `-v` already chose one.

use std::str::FromStr;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, reload, EnvFilter, Registry};

/// Handle used to swap the filter once the config is known
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

const DEFAULT_LEVEL: LevelFilter = LevelFilter::INFO;
const VERBOSE_LEVEL: LevelFilter = LevelFilter::DEBUG;

/// Who decided the log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSource {
    /// `RUST_LOG` is set
    Environment,
    /// `-v` was given
    Verbose,
    /// Neither; the config file may set it
    Default,
}

impl LevelSource {
    pub fn detect(rust_log: Option<&str>, verbose: bool) -> Self {
        match rust_log {
            Some(directives) if !directives.trim().is_empty() => LevelSource::Environment,
            _ if verbose => LevelSource::Verbose,
            _ => LevelSource::Default,
        }
    }
}

/// Filter used until the config is loaded
pub fn startup_filter(source: LevelSource) -> EnvFilter {
    match source {
        LevelSource::Environment => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::default().add_directive(DEFAULT_LEVEL.into())),
        LevelSource::Verbose => EnvFilter::default().add_directive(VERBOSE_LEVEL.into()),
        LevelSource::Default => EnvFilter::default().add_directive(DEFAULT_LEVEL.into()),
    }
}

/// Formatting subscriber writing to `writer`, with a reloadable filter
pub fn subscriber<W>(
    filter: EnvFilter,
    writer: W,
) -> (impl Subscriber + Send + Sync + 'static, FilterHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer));
    (subscriber, handle)
}

/// Switch to the configured level when neither `RUST_LOG` nor `-v` set one
///
/// Returns whether the filter changed. An unknown level name is logged and
/// the startup level kept.
pub fn apply_config_level(handle: &FilterHandle, source: LevelSource, level: &str) -> bool {
    if source != LevelSource::Default {
        tracing::debug!("Log level set by {:?}, ignoring configured '{}'", source, level);
        return false;
    }

    let level = match LevelFilter::from_str(level.trim()) {
        Ok(level) => level,
        Err(_) => {
            tracing::warn!("Invalid log level '{}' in config, keeping {}", level, DEFAULT_LEVEL);
            return false;
        }
    };

    match handle.reload(EnvFilter::default().add_directive(level.into())) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to apply log level {}: {}", level, e);
            false
        }
    }
}
