//! `nxforge generate`: run one generator against the workspace on disk.
//!
//! Responsibility: turn CLI flags plus config defaults into generator
//! options, hand them to the core `GeneratorService`, and report the
//! resulting file changes. No generation logic lives here.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{debug, info, instrument};

use nxforge_adapters::LocalFilesystem;
use nxforge_core::prelude::*;

use crate::{
    cli::{GenerateArgs, GeneratorCommand, OutputFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute `nxforge generate <generator>`.
///
/// 1. Resolve the workspace root
/// 2. Build the generator from flags and config
/// 3. Confirm unless `--yes`, `--quiet` or `--dry-run`
/// 4. Run it through `GeneratorService`
/// 5. Print the changes and the follow-up commands
#[instrument(skip_all, fields(dry_run = args.dry_run))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = resolve_workspace(global.workspace.as_deref())?;
    let generator = build_generator(args.generator, &config)?;
    let info = generator.info();

    debug!(generator = info.id, root = %root.display(), "Generator resolved");

    if !args.dry_run && !args.yes && !global.quiet && std::io::stdin().is_terminal() {
        output.info(&format!("Running {} in {}", info.id, root.display()))?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    let service = GeneratorService::new(Box::new(LocalFilesystem::new(root.clone())));
    let report = service
        .run(generator.as_ref(), args.dry_run)
        .with_cli_context(|| format!("running {}", info.id))?;

    info!(
        generator = info.id,
        changes = report.changes.len(),
        dry_run = report.dry_run,
        "Generation finished"
    );

    if output.format() == OutputFormat::Json {
        return output.json(&report_json(&report)).map_err(Into::into);
    }
    print_report(&report, &output)
}

/// Workspace root: the `--workspace` directory, else the nearest ancestor of
/// the current directory holding `nx.json`, else the current directory.
pub fn resolve_workspace(explicit: Option<&Path>) -> CliResult<PathBuf> {
    if let Some(dir) = explicit {
        if !dir.is_dir() {
            return Err(CliError::WorkspaceNotFound {
                path: dir.to_path_buf(),
            });
        }
        return Ok(dir.to_path_buf());
    }

    let cwd = std::env::current_dir().with_cli_context(|| "failed to read the current directory")?;
    Ok(find_nx_root(&cwd).unwrap_or(cwd))
}

fn find_nx_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join("nx.json").is_file())
        .map(Path::to_path_buf)
}

/// Map a parsed generator subcommand onto its core generator.
///
/// Flags win over config; config wins over the generator's own defaults.
pub fn build_generator(
    command: GeneratorCommand,
    config: &AppConfig,
) -> CliResult<Box<dyn Generator>> {
    let provider = |flag: Option<IacProviderOption>| -> CliResult<IacProviderOption> {
        match flag {
            Some(provider) => Ok(provider),
            None => config.iac_provider(),
        }
    };
    let ts_dir = |flag: Option<String>| flag.unwrap_or_else(|| config.defaults.ts_directory.clone());
    let py_dir = |flag: Option<String>| flag.unwrap_or_else(|| config.defaults.py_directory.clone());

    let generator: Box<dyn Generator> = match command {
        GeneratorCommand::TsProject(args) => {
            let mut options = TsProjectOptions::new(args.name).with_directory(ts_dir(args.directory));
            options.subdirectory = args.subdirectory;
            options.skip_install = args.skip_install;
            Box::new(TsProjectGenerator::new(options))
        }
        GeneratorCommand::PyProject(args) => {
            let mut options = PyProjectOptions::new(args.name);
            options.directory = py_dir(args.directory);
            options.subdirectory = args.subdirectory;
            options.module_name = args.module_name;
            if let Some(project_type) = args.project_type {
                options.project_type = project_type;
            }
            Box::new(PyProjectGenerator::new(options))
        }
        GeneratorCommand::PyFastApi(args) => {
            let mut options = FastApiOptions::new(args.name);
            options.directory = py_dir(args.directory);
            options.iac_provider = provider(args.iac_provider)?;
            if let Some(compute_type) = args.compute_type {
                options.compute_type = compute_type;
            }
            if let Some(auth) = args.auth {
                options.auth = auth;
            }
            if let Some(port) = args.port {
                options.port = port;
            }
            Box::new(FastApiGenerator::new(options))
        }
        GeneratorCommand::TsTrpcApi(args) => {
            let mut options = TrpcApiOptions::new(args.name);
            options.directory = ts_dir(args.directory);
            options.iac_provider = provider(args.iac_provider)?;
            if let Some(compute_type) = args.compute_type {
                options.compute_type = compute_type;
            }
            if let Some(auth) = args.auth {
                options.auth = auth;
            }
            if let Some(port) = args.port {
                options.port = port;
            }
            Box::new(TrpcApiGenerator::new(options))
        }
        GeneratorCommand::TsLambdaFunction(args) => {
            let mut options = TsLambdaFunctionOptions::new(args.project, args.function_name);
            options.function_path = args.function_path;
            options.iac_provider = provider(args.iac_provider)?;
            if let Some(source) = args.event_source {
                options.event_source = source;
            }
            Box::new(TsLambdaFunctionGenerator::new(options))
        }
        GeneratorCommand::PyLambdaFunction(args) => {
            let mut options = PyLambdaFunctionOptions::new(args.project, args.function_name);
            options.function_path = args.function_path;
            options.iac_provider = provider(args.iac_provider)?;
            if let Some(source) = args.event_source {
                options.event_source = source;
            }
            Box::new(PyLambdaFunctionGenerator::new(options))
        }
        GeneratorCommand::TsMcpServer(args) => {
            let mut options = TsMcpServerOptions::new(args.project, args.name);
            options.iac_provider = provider(args.iac_provider)?;
            if let Some(compute_type) = args.compute_type {
                options.compute_type = compute_type;
            }
            Box::new(TsMcpServerGenerator::new(options))
        }
        GeneratorCommand::TsInfra(args) => {
            let mut options = TsInfraOptions::new(args.name);
            options.directory = ts_dir(args.directory);
            Box::new(TsInfraGenerator::new(options))
        }
        GeneratorCommand::TerraformProject(args) => {
            let mut options = TerraformProjectOptions::new(args.name);
            options.directory = ts_dir(args.directory);
            if let Some(project_type) = args.project_type {
                options.project_type = project_type;
            }
            Box::new(TerraformProjectGenerator::new(options))
        }
        GeneratorCommand::TsReactWebsite(args) => {
            let mut options = ReactWebsiteOptions::new(args.name);
            options.directory = ts_dir(args.directory);
            options.iac_provider = provider(args.iac_provider)?;
            Box::new(ReactWebsiteGenerator::new(options))
        }
    };
    Ok(generator)
}

fn print_report(report: &GenerationReport, output: &OutputManager) -> CliResult<()> {
    if report.is_empty() {
        output.info("No changes.")?;
        return Ok(());
    }

    output.header(&format!("{}:", report.generator.id))?;
    for change in &report.changes {
        output.change(change.kind, &change.path)?;
    }
    output.print("")?;

    let summary = format!(
        "{} created, {} updated, {} deleted",
        report.count(ChangeKind::Create),
        report.count(ChangeKind::Update),
        report.count(ChangeKind::Delete),
    );

    if report.dry_run {
        output.warning(&format!("Dry run: {summary}. No files were written."))?;
        return Ok(());
    }
    output.success(&summary)?;

    let tasks = report.callback.tasks();
    if !tasks.is_empty() {
        output.print("")?;
        output.print("Next steps:")?;
        for task in tasks {
            output.print(&format!("  {task}"))?;
        }
    }
    Ok(())
}

fn report_json(report: &GenerationReport) -> serde_json::Value {
    let changes: Vec<_> = report
        .changes
        .iter()
        .map(|c| json!({ "kind": c.kind.as_str(), "path": c.path }))
        .collect();
    let next_steps: Vec<_> = report.callback.tasks().iter().map(|t| t.command()).collect();
    json!({
        "generator": report.generator.id,
        "dryRun": report.dry_run,
        "changes": changes,
        "nextSteps": next_steps,
    })
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Write these changes?")
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Write these changes? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ApiArgs, LambdaFunctionArgs, TsProjectArgs};
    use tempfile::TempDir;

    #[test]
    fn explicit_workspace_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            resolve_workspace(Some(&missing)),
            Err(CliError::WorkspaceNotFound { .. })
        ));
        assert_eq!(resolve_workspace(Some(dir.path())).unwrap(), dir.path());
    }

    #[test]
    fn nx_root_is_found_from_a_subdirectory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("nx.json"), "{}").unwrap();
        let nested = dir.path().join("packages/api/src");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_nx_root(&nested).unwrap(), dir.path());
    }

    #[test]
    fn builds_the_matching_generator() {
        let generator = build_generator(
            GeneratorCommand::TsProject(TsProjectArgs {
                name: "utils".into(),
                directory: None,
                subdirectory: None,
                skip_install: true,
            }),
            &AppConfig::default(),
        )
        .unwrap();
        assert_eq!(generator.info().id, "ts#project");
    }

    #[test]
    fn configured_provider_must_be_valid() {
        let mut config = AppConfig::default();
        config.defaults.iac_provider = "Pulumi".into();

        let command = GeneratorCommand::TsLambdaFunction(LambdaFunctionArgs {
            project: "backend".into(),
            function_name: "resize".into(),
            function_path: None,
            event_source: None,
            iac_provider: None,
        });
        assert!(matches!(
            build_generator(command, &config),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn provider_flag_skips_config() {
        let mut config = AppConfig::default();
        config.defaults.iac_provider = "Pulumi".into();

        let command = GeneratorCommand::PyFastApi(ApiArgs {
            name: "orders".into(),
            directory: None,
            compute_type: None,
            auth: None,
            iac_provider: Some(IacProviderOption::Cdk),
            port: Some(9000),
        });
        let generator = build_generator(command, &config).unwrap();
        assert_eq!(generator.info().id, "py#fast-api");
    }
}
