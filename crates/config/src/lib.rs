//! Layered settings for mailview
//!
//! A [`Settings`] type lives in one JSON file under ~/.config/mailview/.
//! Loading resolves three layers, highest priority first:
//! 1. Environment variables, applied by [`Settings::apply_env`]
//! 2. The JSON file, where absent fields fall back to defaults
//! 3. [`Default`]
//!
//! The merged value is validated before it is handed out.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "mailview";

/// Environment lookup; `std::env::var` in production, a map in tests
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// A settings struct stored as `FILE` in the config directory
pub trait Settings: Serialize + DeserializeOwned + Default {
    const FILE: &'static str;

    /// Apply overrides from the environment on top of the file layer
    fn apply_env(self, env: EnvLookup<'_>) -> Self;

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Where a loaded value came from, for startup logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Defaults,
}

/// Create ~/.config/mailview/ if needed. Call once at startup.
pub fn init() -> Result<PathBuf> {
    let dir = config_dir().context("Could not determine config directory")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    Ok(dir)
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

/// Load `T` from the config directory with process environment overrides
pub fn load<T: Settings>() -> Result<(T, Source)> {
    let dir = config_dir().context("Could not determine config directory")?;
    load_in(&dir, &|key| std::env::var(key).ok())
}

/// Load `T` from `dir`, then apply `env` and validate
pub fn load_in<T: Settings>(dir: &Path, env: EnvLookup<'_>) -> Result<(T, Source)> {
    let path = dir.join(T::FILE);
    let (base, source) = if path.exists() {
        (read_file(&path)?, Source::File(path))
    } else {
        (T::default(), Source::Defaults)
    };
    let settings = base.apply_env(env);
    settings
        .validate()
        .with_context(|| format!("Invalid settings in {}", T::FILE))?;
    Ok((settings, source))
}

/// Load `T` from an explicit file; no environment layer
pub fn load_file<T: Settings>(path: &Path) -> Result<T> {
    let settings: T = read_file(path)?;
    settings
        .validate()
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    Ok(settings)
}

/// Write `T::default()` on first run so users have a file to edit
///
/// Returns the path written, or `None` if the file already exists.
pub fn write_default<T: Settings>() -> Result<Option<PathBuf>> {
    let dir = init()?;
    write_default_in::<T>(&dir)
}

pub fn write_default_in<T: Settings>(dir: &Path) -> Result<Option<PathBuf>> {
    let path = dir.join(T::FILE);
    if path.exists() {
        return Ok(None);
    }
    let content = serde_json::to_string_pretty(&T::default())?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(Some(path))
}

fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
