use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

pub const DEFAULT_DB_PATH: &str = "exr_attrs.sqlite";
pub const DEFAULT_EXTENSION: &str = "exr";

const DB_KEY: &str = "EXR_CATALOG_DB";
const ROOT_VOLUME_KEY: &str = "EXR_CATALOG_ROOT_VOLUME";
const EXTENSION_KEY: &str = "EXR_CATALOG_EXTENSION";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub root_volume: Option<String>,
    pub extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            root_volume: None,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

/// Values given on the command line; each one wins over the env file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub db_path: Option<PathBuf>,
    pub root_volume: Option<String>,
    pub extension: Option<String>,
}

/// Main entry point to get settings.
/// Reads the env file when there is one, then applies command-line overrides.
pub fn load_settings(env_path: &Path, overrides: Overrides) -> Result<Settings> {
    let mut settings = if env_path.exists() {
        let settings = load_from_env(env_path)
            .with_context(|| format!("Failed to read settings from {:?}", env_path))?;
        info!("Loaded settings from {:?}", env_path);
        settings
    } else {
        Settings::default()
    };

    if let Some(db_path) = overrides.db_path {
        settings.db_path = db_path;
    }
    if let Some(root_volume) = overrides.root_volume {
        settings.root_volume = Some(root_volume);
    }
    if let Some(extension) = overrides.extension {
        settings.extension = extension;
    }
    settings.extension = settings.extension.trim_start_matches('.').to_string();

    Ok(settings)
}

fn load_from_env(path: &Path) -> Result<Settings> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut settings = Settings::default();

    for line in reader.lines() {
        let line = line?;
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            match key.trim() {
                DB_KEY => settings.db_path = PathBuf::from(value),
                ROOT_VOLUME_KEY if !value.is_empty() => settings.root_volume = Some(value.to_string()),
                EXTENSION_KEY => settings.extension = value.to_string(),
                _ => {}
            }
        }
    }

    Ok(settings)
}

pub fn save_to_env(path: &Path, settings: &Settings) -> Result<()> {
    let mut file = File::create(path).context("Failed to create env file")?;
    writeln!(file, "{}={}", DB_KEY, settings.db_path.display())?;
    if let Some(root_volume) = &settings.root_volume {
        writeln!(file, "{}={}", ROOT_VOLUME_KEY, root_volume)?;
    }
    writeln!(file, "{}={}", EXTENSION_KEY, settings.extension)?;
    Ok(())
}
