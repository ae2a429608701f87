//! Configuration management for the scaffolder
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (scaffold.toml, .scaffold.toml, config/scaffold.toml)
//! - The user config directory
//! - An explicit `--config` file
//! - Environment variables (SCAFFOLD__SECTION__KEY)
//!
//! ## Example config file (scaffold.toml):
//! ```toml
//! [output]
//! root = "./generated"
//! overwrite = false
//! manifest = true
//!
//! [generation]
//! default_template = "crud"
//! api_base = "/api"
//! widgets_import = "@/components/fields"
//! db_import = "@/lib/db"
//! default_options = ["option-1", "option-2", "option-3"]
//!
//! [logging]
//! level = "info"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::codegen::{default_enum_options, GenerationOptions, TemplateLibrary};
use crate::error::Result;
use crate::input::TemplateSet;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    /// Where and how files are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Generated code settings
    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the entity folders are created in
    #[serde(default = "default_output_root")]
    pub root: PathBuf,

    /// Replace files that already exist
    #[serde(default)]
    pub overwrite: bool,

    /// Write `.scaffold-manifest.json` next to the generated files
    #[serde(default = "default_true")]
    pub manifest: bool,
}

/// Generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Template set used when the input names none
    #[serde(default)]
    pub default_template: TemplateSet,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_widgets_import")]
    pub widgets_import: String,

    #[serde(default = "default_db_import")]
    pub db_import: String,

    #[serde(default = "default_format_import")]
    pub format_import: String,

    /// Options for enumerated fields declared without any
    #[serde(default = "default_enum_options")]
    pub default_options: Vec<String>,

    /// Directory of `*.tmpl` files overriding the built-in templates
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_output_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_api_base() -> String {
    GenerationOptions::default().api_base
}

fn default_widgets_import() -> String {
    GenerationOptions::default().widgets_import
}

fn default_db_import() -> String {
    GenerationOptions::default().db_import
}

fn default_format_import() -> String {
    GenerationOptions::default().format_import
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            overwrite: false,
            manifest: true,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_template: TemplateSet::default(),
            api_base: default_api_base(),
            widgets_import: default_widgets_import(),
            db_import: default_db_import(),
            format_import: default_format_import(),
            default_options: default_enum_options(),
            templates_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl GenerationConfig {
    /// Options handed to the generators
    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            api_base: self.api_base.clone(),
            widgets_import: self.widgets_import.clone(),
            db_import: self.db_import.clone(),
            format_import: self.format_import.clone(),
            default_options: self.default_options.clone(),
        }
    }

    /// Built-in templates, shadowed by the override directory when configured
    pub fn templates(&self) -> Result<TemplateLibrary> {
        match &self.templates_dir {
            Some(dir) => TemplateLibrary::with_overrides(dir),
            None => Ok(TemplateLibrary::builtin()),
        }
    }
}

impl ScaffoldConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the defaults
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = ["scaffold.toml", ".scaffold.toml", "config/scaffold.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(path) = Self::user_config_path() {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // SCAFFOLD__OUTPUT__ROOT, SCAFFOLD__GENERATION__API_BASE, ...
        builder = builder.add_source(
            Environment::with_prefix("SCAFFOLD")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// `scaffold.toml` in the user config directory
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "dashboard-scaffold", "scaffold")
            .map(|dirs| dirs.config_dir().join("scaffold.toml"))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    }

    /// Output root (resolves relative paths)
    pub fn output_root(&self) -> PathBuf {
        if self.output.root.is_absolute() {
            self.output.root.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.output.root)
        }
    }
}
