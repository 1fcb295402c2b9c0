//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE: &str = "models.yaml";
pub const DEFAULT_SCHEMA_OUTPUT: &str = "generated_schemas.json";
pub const DEFAULT_DATA_OUTPUT: &str = "generated_data.json";

/// Name of the per-directory config file
pub const PROJECT_CONFIG_FILE: &str = ".modelgen.yaml";

/// modelgen configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Definitions file to load
    pub source: Option<PathBuf>,

    /// Where the schema document is written
    pub schema_output: Option<PathBuf>,

    /// Where the example document is written
    pub data_output: Option<PathBuf>,

    /// Check examples against their schema before writing them
    pub validate_examples: Option<bool>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (accessor fallbacks)

        // 2. Global user config (~/.config/modelgen/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::from_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (./.modelgen.yaml)
        if let Ok(cwd) = std::env::current_dir() {
            if let Some(project) = Self::from_file(&cwd.join(PROJECT_CONFIG_FILE)) {
                config.merge(project);
            }
        }

        // 4. Environment variables
        if let Ok(source) = std::env::var("MODELGEN_SOURCE") {
            config.source = Some(PathBuf::from(source));
        }
        if let Ok(path) = std::env::var("MODELGEN_SCHEMA_OUTPUT") {
            config.schema_output = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("MODELGEN_DATA_OUTPUT") {
            config.data_output = Some(PathBuf::from(path));
        }

        config
    }

    /// Read one config file. Missing or unparseable files yield `None`.
    pub fn from_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        serde_yml::from_str::<Config>(&contents).ok()
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "modelgen")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.source.is_some() {
            self.source = other.source;
        }
        if other.schema_output.is_some() {
            self.schema_output = other.schema_output;
        }
        if other.data_output.is_some() {
            self.data_output = other.data_output;
        }
        if other.validate_examples.is_some() {
            self.validate_examples = other.validate_examples;
        }
    }

    pub fn source(&self) -> PathBuf {
        self.source
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE))
    }

    pub fn schema_output(&self) -> PathBuf {
        self.schema_output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_OUTPUT))
    }

    pub fn data_output(&self) -> PathBuf {
        self.data_output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_OUTPUT))
    }

    pub fn validate_examples(&self) -> bool {
        self.validate_examples.unwrap_or(true)
    }
}
