//! `nxforge config`: read and write configuration values.

use std::path::PathBuf;

use tracing::info;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
///
/// `get` and `list` show the effective configuration (file plus
/// environment). `set` edits the file alone so environment overrides are
/// never persisted.
pub fn execute(
    cmd: ConfigCommands,
    config_file: Option<PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let path = config_file.unwrap_or_else(AppConfig::config_path);

    match cmd {
        ConfigCommands::Get { key } => {
            println!("{}", config.get(&key)?);
        }

        ConfigCommands::Set { key, value } => {
            let mut stored = AppConfig::read_file(&path)?;
            stored.set(&key, &value)?;
            stored.save(&path)?;
            info!(key = %key, path = %path.display(), "Config updated");
            output.success(&format!("{key} = {}", stored.get(&key)?))?;
        }

        ConfigCommands::List => {
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.header("Current configuration:")?;
            output.print(serialised.trim_end())?;
        }

        ConfigCommands::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}
