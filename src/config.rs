//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/dtree/dtree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `DTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, IoResultExt};
use crate::domain::DEFAULT_MAX_STEPS;
use crate::render::Format;

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub max_steps: Option<usize>,
    pub indent_size: Option<usize>,
    pub format: Option<Format>,
}

/// Unified configuration for dtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Step bound for traversals (default: 100)
    pub max_steps: usize,
    /// Spaces per indent level in text output (default: 2)
    pub indent_size: usize,
    /// Output format of `render` when none is given (default: ascii)
    pub format: Format,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            indent_size: 2,
            format: Format::default(),
        }
    }
}

/// Get the XDG config directory for dtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("dtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).with_config_context(path)?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins where it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            max_steps: overlay.max_steps.unwrap_or(self.max_steps),
            indent_size: overlay.indent_size.unwrap_or(self.indent_size),
            format: overlay.format.unwrap_or(self.format),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// An explicit `config_file` must exist; the global file is optional.
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            debug!("config file: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply DTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("DTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("max_steps") {
            settings.max_steps = val.parse().map_err(|_| ApplicationError::Config {
                message: format!("DTREE_MAX_STEPS: not a number: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("indent_size") {
            settings.indent_size = val.parse().map_err(|_| ApplicationError::Config {
                message: format!("DTREE_INDENT_SIZE: not a number: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("format") {
            settings.format = serde_json::from_value(serde_json::Value::String(val.to_lowercase()))
                .map_err(|_| ApplicationError::Config {
                    message: format!("DTREE_FORMAT: unknown format: {val}"),
                })?;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.max_steps == 0 {
            return Err(ApplicationError::Config {
                message: "max_steps must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# dtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/dtree/dtree.toml
#   Explicit: file passed with --config
#   Env:      DTREE_* environment variables (DTREE_MAX_STEPS, DTREE_INDENT_SIZE, DTREE_FORMAT)

# Step bound for traversals; cyclic trees stop here
# max_steps = 100

# Spaces per indent level in text output
# indent_size = 2

# Default render format: text, ascii, mermaid, dot
# format = "ascii"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_then_step_bound_is_engine_default() {
        let settings = Settings::default();
        assert_eq!(settings.max_steps, DEFAULT_MAX_STEPS);
        assert_eq!(settings.indent_size, 2);
        assert_eq!(settings.format, Format::Ascii);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified() {
        let overlay = RawSettings {
            max_steps: Some(10),
            indent_size: None,
            format: Some(Format::Dot),
        };

        let merged = Settings::default().merge_with(&overlay);

        assert_eq!(merged.max_steps, 10);
        assert_eq!(merged.indent_size, 2);
        assert_eq!(merged.format, Format::Dot);
    }

    #[test]
    fn given_template_when_parsed_then_yields_empty_overlay() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.max_steps.is_none());
        assert!(raw.format.is_none());
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips_through_raw() {
        let settings = Settings {
            max_steps: 42,
            indent_size: 4,
            format: Format::Mermaid,
        };
        let raw: RawSettings = toml::from_str(&settings.to_toml().unwrap()).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), settings);
    }

    #[test]
    fn given_zero_steps_when_validating_then_error() {
        let settings = Settings {
            max_steps: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
