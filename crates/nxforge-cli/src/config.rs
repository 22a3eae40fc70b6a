//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables `NXFORGE_<SECTION>__<KEY>`, e.g.
//!    `NXFORGE_DEFAULTS__IAC_PROVIDER=Terraform`
//! 3. Config file (`--config`, or the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use nxforge_core::domain::IacProviderOption;

use crate::error::{CliError, CliResult};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults applied to generator options the user leaves out.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// `CDK`, `Terraform` or `Inherit`.
    pub iac_provider: String,
    pub ts_directory: String,
    pub py_directory: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            iac_provider: "Inherit".into(),
            ts_directory: "packages".into(),
            py_directory: "packages".into(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

/// Keys accepted by `config get` / `config set`.
pub const KEYS: &[&str] = &[
    "defaults.iac_provider",
    "defaults.ts_directory",
    "defaults.py_directory",
    "output.no_color",
    "output.format",
];

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// A missing file is not an error so that `init` and `config set` can
    /// create it; a malformed one is.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let path = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);

        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;
        let loaded: Self = config::Config::builder()
            .add_source(defaults)
            .add_source(
                config::File::from(path.as_path())
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("NXFORGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.nxforge.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "nxforge", "nxforge")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".nxforge.toml"))
    }

    /// The configured default IaC provider.
    pub fn iac_provider(&self) -> CliResult<IacProviderOption> {
        IacProviderOption::from_str(&self.defaults.iac_provider).map_err(|e| CliError::ConfigError {
            message: format!("defaults.iac_provider: {e}"),
            source: Some(Box::new(e)),
        })
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.iac_provider()
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        if !["auto", "human", "plain", "json"].contains(&self.output.format.as_str()) {
            anyhow::bail!(
                "output.format must be one of auto, human, plain, json (got '{}')",
                self.output.format
            );
        }
        Ok(())
    }

    /// Value of a dotted key, as a string.
    pub fn get(&self, key: &str) -> CliResult<String> {
        match key {
            "defaults.iac_provider" => Ok(self.defaults.iac_provider.clone()),
            "defaults.ts_directory" => Ok(self.defaults.ts_directory.clone()),
            "defaults.py_directory" => Ok(self.defaults.py_directory.clone()),
            "output.no_color" => Ok(self.output.no_color.to_string()),
            "output.format" => Ok(self.output.format.clone()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a dotted key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> CliResult<()> {
        match key {
            "defaults.iac_provider" => {
                let provider = IacProviderOption::from_str(value).map_err(|e| {
                    CliError::InvalidInput {
                        message: format!("{key}: {e}"),
                        source: Some(Box::new(e)),
                    }
                })?;
                self.defaults.iac_provider = provider.as_str().to_string();
            }
            "defaults.ts_directory" => self.defaults.ts_directory = value.to_string(),
            "defaults.py_directory" => self.defaults.py_directory = value.to_string(),
            "output.no_color" => {
                self.output.no_color = value.parse().map_err(|e| CliError::InvalidInput {
                    message: format!("{key} expects true or false, got '{value}'"),
                    source: Some(Box::new(e)),
                })?;
            }
            "output.format" => {
                if !["auto", "human", "plain", "json"].contains(&value) {
                    return Err(CliError::InvalidInput {
                        message: format!("{key} must be one of auto, human, plain, json"),
                        source: None,
                    });
                }
                self.output.format = value.to_string();
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Serialize to TOML and write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        let toml = toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CliError::IoError {
                message: format!("Failed to create config directory '{}'", parent.display()),
                source: e,
            })?;
        }
        std::fs::write(path, toml).map_err(|e| CliError::IoError {
            message: format!("Failed to write config to '{}'", path.display()),
            source: e,
        })
    }

    /// Read the TOML file at `path` alone, without environment overrides.
    /// A missing file yields the defaults.
    pub fn read_file(path: &Path) -> CliResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| CliError::ConfigError {
                message: format!("Failed to parse {}: {e}", path.display()),
                source: Some(Box::new(e)),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(CliError::IoError {
                message: format!("Failed to read config from '{}'", path.display()),
                source: e,
            }),
        }
    }
}

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Unknown config key: '{key}' (known keys: {})", KEYS.join(", ")),
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_inherit_provider() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.iac_provider, "Inherit");
        assert_eq!(cfg.iac_provider().unwrap(), IacProviderOption::Inherit);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nxforge.toml");
        std::fs::write(&path, "[defaults]\niac_provider = \"Terraform\"\n").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.iac_provider().unwrap(), IacProviderOption::Terraform);
        assert_eq!(cfg.defaults.ts_directory, "packages");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(cfg.defaults.py_directory, "packages");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nxforge.toml");
        std::fs::write(&path, "[defaults\n").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn invalid_provider_in_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nxforge.toml");
        std::fs::write(&path, "[defaults]\niac_provider = \"Pulumi\"\n").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn set_then_save_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut cfg = AppConfig::default();
        cfg.set("defaults.iac_provider", "terraform").unwrap();
        cfg.set("output.no_color", "true").unwrap();
        cfg.save(&path).unwrap();

        let reread = AppConfig::read_file(&path).unwrap();
        assert_eq!(reread.get("defaults.iac_provider").unwrap(), "Terraform");
        assert_eq!(reread.get("output.no_color").unwrap(), "true");
    }

    #[test]
    fn unknown_key_is_a_config_error() {
        let mut cfg = AppConfig::default();
        assert!(matches!(cfg.get("does.not.exist"), Err(CliError::ConfigError { .. })));
        assert!(matches!(cfg.set("output.no_color", "maybe"), Err(CliError::InvalidInput { .. })));
    }
}
