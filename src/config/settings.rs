use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use toml_edit::{DocumentMut, Item, Table};

use crate::util::paths::config_path;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Listener template merged into on export
    pub template_path: PathBuf,
    /// Destination of the exported profile
    pub output_path: PathBuf,
    /// Default tracing level directive
    pub log_level: String,
    /// Body panel width used to resolve ROW,COL cursors
    pub panel_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("./resources/brc4_template.json"),
            output_path: PathBuf::from("output.json"),
            log_level: "warn".to_string(),
            panel_width: 80,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlExportConfig {
    pub template: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlLogConfig {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlViewConfig {
    pub panel_width: Option<usize>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub export: Option<TomlExportConfig>,
    pub log: Option<TomlLogConfig>,
    pub view: Option<TomlViewConfig>,
}

impl Config {
    /// Load the config from the default location, creating the example file
    /// on first run. A missing or unreadable file yields the defaults.
    ///
    /// Runs before logging is set up, so problems are reported on stderr.
    pub fn load() -> Self {
        let config_file = config_path();

        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        match Self::load_from(&config_file) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}. Using default settings.", e);
                Config::default()
            }
        }
    }

    /// Load a specific config file, layering it over the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let toml_config =
            toml::from_str::<TomlConfig>(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Config::default().merged_with(toml_config))
    }

    fn merged_with(mut self, toml_config: TomlConfig) -> Self {
        if let Some(export) = toml_config.export {
            if let Some(template) = export.template {
                self.template_path = template;
            }
            if let Some(output) = export.output {
                self.output_path = output;
            }
        }

        if let Some(log) = toml_config.log {
            if let Some(level) = log.level {
                self.log_level = level;
            }
        }

        if let Some(view) = toml_config.view {
            if let Some(panel_width) = view.panel_width {
                self.panel_width = panel_width;
            }
        }

        self
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    eprintln!("Failed to create config directory: {}", e);
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            eprintln!("Failed to write default config: {}", e);
        }
    }
}

/// Export setting that can be persisted from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKey {
    Template,
    Output,
}

impl ExportKey {
    fn toml_key(self) -> &'static str {
        match self {
            ExportKey::Template => "template",
            ExportKey::Output => "output",
        }
    }
}

impl fmt::Display for ExportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "export.{}", self.toml_key())
    }
}

/// Save an export path to the config file
///
/// Reads the existing config.toml, adds or updates the key in the [export]
/// section, and writes it back while preserving all other content.
pub fn save_export_path(config_file: &Path, key: ExportKey, path: &Path) -> std::io::Result<()> {
    let contents = if config_file.exists() {
        fs::read_to_string(config_file)?
    } else {
        String::new()
    };

    let mut doc: DocumentMut = contents
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    if !doc.contains_key("export") {
        doc["export"] = Item::Table(Table::new());
    }

    let path_str = path.to_string_lossy().to_string();
    doc["export"][key.toml_key()] = toml_edit::value(path_str);

    if let Some(parent) = config_file.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(config_file, doc.to_string())?;
    tracing::info!(key = %key, path = %path.display(), "Saved config value");

    Ok(())
}
