//! Log output of the binary's tracing setup
//!
//! Each test installs its own subscriber with `with_default` and captures
//! the formatted output in memory.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use texassign_common::config::{ConfigResolver, TomlConfig};
use texassign_scan::logging::{self, LevelSource};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory log sink
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'w> MakeWriter<'w> for Captured {
    type Writer = Captured;

    fn make_writer(&'w self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn test_level_source_detection() {
    assert_eq!(LevelSource::detect(Some("texassign=trace"), true), LevelSource::Environment);
    assert_eq!(LevelSource::detect(Some("  "), true), LevelSource::Verbose);
    assert_eq!(LevelSource::detect(None, true), LevelSource::Verbose);
    assert_eq!(LevelSource::detect(None, false), LevelSource::Default);
}

#[test]
fn test_missing_config_file_warning_is_logged() {
    let temp_dir = TempDir::new().unwrap();
    let missing: PathBuf = temp_dir.path().join("typo.toml");

    let captured = Captured::default();
    let (subscriber, _handle) =
        logging::subscriber(logging::startup_filter(LevelSource::Default), captured.clone());

    let config = tracing::subscriber::with_default(subscriber, || {
        ConfigResolver::new(Some(missing.clone())).resolve().unwrap()
    });

    assert_eq!(config, TomlConfig::default());
    let output = captured.text();
    assert!(output.contains("WARN"), "no warning in: {}", output);
    assert!(output.contains("typo.toml"), "no path in: {}", output);
    assert!(output.contains("not found"), "no message in: {}", output);
}

#[test]
fn test_configured_level_replaces_startup_level() {
    let captured = Captured::default();
    let (subscriber, handle) =
        logging::subscriber(logging::startup_filter(LevelSource::Default), captured.clone());

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("info before reload");
        assert!(logging::apply_config_level(&handle, LevelSource::Default, "warn"));
        tracing::info!("info after reload");
        tracing::warn!("warn after reload");
    });

    let output = captured.text();
    assert!(output.contains("info before reload"));
    assert!(!output.contains("info after reload"));
    assert!(output.contains("warn after reload"));
}

#[test]
fn test_verbose_level_is_not_overridden_by_config() {
    let captured = Captured::default();
    let (subscriber, handle) =
        logging::subscriber(logging::startup_filter(LevelSource::Verbose), captured.clone());

    tracing::subscriber::with_default(subscriber, || {
        assert!(!logging::apply_config_level(&handle, LevelSource::Verbose, "error"));
        tracing::debug!("debug still shown");
    });

    assert!(captured.text().contains("debug still shown"));
}

#[test]
fn test_invalid_configured_level_keeps_startup_level() {
    let captured = Captured::default();
    let (subscriber, handle) =
        logging::subscriber(logging::startup_filter(LevelSource::Default), captured.clone());

    tracing::subscriber::with_default(subscriber, || {
        assert!(!logging::apply_config_level(&handle, LevelSource::Default, "loud"));
        tracing::info!("info still shown");
    });

    let output = captured.text();
    assert!(output.contains("Invalid log level 'loud'"));
    assert!(output.contains("info still shown"));
}
