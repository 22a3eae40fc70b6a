//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

use nxforge_core::domain::{
    Auth, ComputeType, EventSource, IacProviderOption, McpComputeType, ProjectType,
};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "nxforge",
    bin_name = "nxforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Generators for AWS projects in Nx workspaces",
    long_about = "nxforge adds APIs, websites, Lambda functions, MCP servers and \
                  CDK or Terraform infrastructure to an Nx monorepo, wiring \
                  build targets across projects as it goes.",
    after_help = "EXAMPLES:\n\
        \x20 nxforge generate py-fast-api orders-api\n\
        \x20 nxforge g ts-lambda-function --project backend --function-name resize-image\n\
        \x20 nxforge g ts-infra infra --dry-run\n\
        \x20 nxforge list --format json",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a generator against the workspace.
    #[command(
        visible_alias = "g",
        about = "Run a generator",
        after_help = "EXAMPLES:\n\
            \x20 nxforge generate ts-project utils\n\
            \x20 nxforge generate py-fast-api my-api --iac-provider Terraform\n\
            \x20 nxforge generate ts-mcp-server --project agents --name calculator --yes"
    )]
    Generate(GenerateArgs),

    /// List available generators.
    #[command(
        visible_alias = "ls",
        about = "List available generators",
        after_help = "EXAMPLES:\n\
            \x20 nxforge list\n\
            \x20 nxforge list --lang py\n\
            \x20 nxforge list --format csv"
    )]
    List(ListArgs),

    /// Initialise an nxforge configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 nxforge init\n\
            \x20 nxforge init --force\n\
            \x20 nxforge -c ./nxforge.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 nxforge completions bash > ~/.local/share/bash-completion/completions/nxforge\n\
            \x20 nxforge completions zsh  > ~/.zfunc/_nxforge\n\
            \x20 nxforge completions fish > ~/.config/fish/completions/nxforge.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the nxforge configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 nxforge config get defaults.iac_provider\n\
            \x20 nxforge config set defaults.iac_provider Terraform\n\
            \x20 nxforge config list"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `nxforge generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Preview the changes without writing any files.
    #[arg(
        long = "dry-run",
        global = true,
        help = "Show what would change without writing"
    )]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        global = true,
        help = "Skip confirmation and write immediately"
    )]
    pub yes: bool,

    /// Generator to run.
    #[command(subcommand)]
    pub generator: GeneratorCommand,
}

/// One subcommand per generator.
#[derive(Debug, Subcommand)]
pub enum GeneratorCommand {
    /// ts#project: a TypeScript library.
    TsProject(TsProjectArgs),
    /// py#project: a Python project in the uv workspace.
    PyProject(PyProjectArgs),
    /// py#fast-api: a FastAPI API on Lambda.
    PyFastApi(ApiArgs),
    /// ts#trpc-api: a tRPC API on Lambda.
    TsTrpcApi(ApiArgs),
    /// ts#lambda-function: a Lambda handler in a TypeScript project.
    TsLambdaFunction(LambdaFunctionArgs),
    /// py#lambda-function: a Lambda handler in a Python project.
    PyLambdaFunction(LambdaFunctionArgs),
    /// ts#mcp-server: an MCP server in a TypeScript project.
    TsMcpServer(McpServerArgs),
    /// ts#infra: a CDK application.
    TsInfra(NamedProjectArgs),
    /// terraform#project: a Terraform root module.
    TerraformProject(TerraformProjectArgs),
    /// ts#react-website: a React website on CloudFront.
    TsReactWebsite(WebsiteArgs),
}

/// Arguments for `generate ts-project`.
#[derive(Debug, Args)]
pub struct TsProjectArgs {
    /// Project name.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Parent directory of the project.
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: Option<String>,

    /// Directory name under the parent (default: the kebab-cased name).
    #[arg(long = "subdirectory", value_name = "DIR")]
    pub subdirectory: Option<String>,

    /// Do not ask for `pnpm install` afterwards.
    #[arg(long = "skip-install")]
    pub skip_install: bool,
}

/// Arguments for `generate py-project`.
#[derive(Debug, Args)]
pub struct PyProjectArgs {
    /// Project name.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Parent directory of the project.
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: Option<String>,

    /// Directory name under the parent (default: the snake_cased name).
    #[arg(long = "subdirectory", value_name = "DIR")]
    pub subdirectory: Option<String>,

    /// `application` or `library`.
    #[arg(long = "project-type", value_name = "TYPE")]
    pub project_type: Option<ProjectType>,

    /// Python module name (default: derived from scope and name).
    #[arg(long = "module-name", value_name = "MODULE")]
    pub module_name: Option<String>,
}

/// Arguments shared by the API generators.
#[derive(Debug, Args)]
pub struct ApiArgs {
    /// API name.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Parent directory of the project.
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: Option<String>,

    /// `ServerlessApiGatewayRestApi` or `ServerlessApiGatewayHttpApi`.
    #[arg(long = "compute-type", value_name = "TYPE")]
    pub compute_type: Option<ComputeType>,

    /// `IAM`, `Cognito` or `None`.
    #[arg(long = "auth", value_name = "AUTH")]
    pub auth: Option<Auth>,

    /// `CDK`, `Terraform` or `Inherit`.
    #[arg(long = "iac-provider", value_name = "PROVIDER")]
    pub iac_provider: Option<IacProviderOption>,

    /// Lowest port the local dev server may use.
    #[arg(long = "port", value_name = "PORT")]
    pub port: Option<u16>,
}

/// Arguments shared by the Lambda function generators.
#[derive(Debug, Args)]
pub struct LambdaFunctionArgs {
    /// Project to add the function to (with or without scope).
    #[arg(short = 'p', long = "project", value_name = "PROJECT")]
    pub project: String,

    /// Function name.
    #[arg(short = 'n', long = "function-name", value_name = "NAME")]
    pub function_name: String,

    /// Directory below the project's source root.
    #[arg(long = "function-path", value_name = "PATH")]
    pub function_path: Option<String>,

    /// Event type the handler receives, e.g. `SqsModel` or `Any`.
    #[arg(long = "event-source", value_name = "SOURCE")]
    pub event_source: Option<EventSource>,

    /// `CDK`, `Terraform` or `Inherit`.
    #[arg(long = "iac-provider", value_name = "PROVIDER")]
    pub iac_provider: Option<IacProviderOption>,
}

/// Arguments for `generate ts-mcp-server`.
#[derive(Debug, Args)]
pub struct McpServerArgs {
    /// Project to add the server to (with or without scope).
    #[arg(short = 'p', long = "project", value_name = "PROJECT")]
    pub project: String,

    /// Server name.
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: String,

    /// `BedrockAgentCoreRuntime` or `None`.
    #[arg(long = "compute-type", value_name = "TYPE")]
    pub compute_type: Option<McpComputeType>,

    /// `CDK`, `Terraform` or `Inherit`.
    #[arg(long = "iac-provider", value_name = "PROVIDER")]
    pub iac_provider: Option<IacProviderOption>,
}

/// Arguments for generators that only need a name and a directory.
#[derive(Debug, Args)]
pub struct NamedProjectArgs {
    /// Project name.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Parent directory of the project.
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: Option<String>,
}

/// Arguments for `generate terraform-project`.
#[derive(Debug, Args)]
pub struct TerraformProjectArgs {
    /// Project name.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Parent directory of the project.
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: Option<String>,

    /// `application` or `library`.
    #[arg(long = "project-type", value_name = "TYPE")]
    pub project_type: Option<ProjectType>,
}

/// Arguments for `generate ts-react-website`.
#[derive(Debug, Args)]
pub struct WebsiteArgs {
    /// Website name.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Parent directory of the project.
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: Option<String>,

    /// `CDK`, `Terraform` or `Inherit`.
    #[arg(long = "iac-provider", value_name = "PROVIDER")]
    pub iac_provider: Option<IacProviderOption>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `nxforge list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Filter by language prefix.
    #[arg(short = 'l', long = "lang", value_enum, help = "Filter by language")]
    pub language: Option<Language>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One id per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

/// Generator id prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Language {
    /// Also accepted as `typescript`.
    #[value(alias = "typescript")]
    Ts,
    /// Also accepted as `python`.
    #[value(alias = "python")]
    Py,
    /// Also accepted as `tf`.
    #[value(alias = "tf")]
    Terraform,
}

impl Language {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Ts => "ts",
            Self::Py => "py",
            Self::Terraform => "terraform",
        }
    }
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `nxforge init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `nxforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `nxforge config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.iac_provider`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_with_alias() {
        let cli = Cli::parse_from(["nxforge", "g", "py-fast-api", "orders-api", "--port", "9000"]);
        match cli.command {
            Commands::Generate(GenerateArgs {
                generator: GeneratorCommand::PyFastApi(args),
                dry_run,
                ..
            }) => {
                assert_eq!(args.name, "orders-api");
                assert_eq!(args.port, Some(9000));
                assert!(!dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn generator_flags_parse_domain_values() {
        let cli = Cli::parse_from([
            "nxforge",
            "generate",
            "ts-lambda-function",
            "--project",
            "backend",
            "--function-name",
            "resize",
            "--event-source",
            "sqs",
            "--iac-provider",
            "terraform",
            "--dry-run",
        ]);
        let Commands::Generate(GenerateArgs {
            generator: GeneratorCommand::TsLambdaFunction(args),
            dry_run,
            ..
        }) = cli.command
        else {
            panic!("expected ts-lambda-function");
        };
        assert_eq!(args.event_source, Some(EventSource::Sqs));
        assert_eq!(args.iac_provider, Some(IacProviderOption::Terraform));
        assert!(dry_run);
    }

    #[test]
    fn invalid_provider_is_rejected() {
        let result = Cli::try_parse_from([
            "nxforge",
            "generate",
            "ts-react-website",
            "site",
            "--iac-provider",
            "pulumi",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn language_aliases() {
        let cli = Cli::parse_from(["nxforge", "list", "--lang", "python"]);
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.language, Some(Language::Py));
        assert_eq!(Language::Terraform.prefix(), "terraform");
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["nxforge", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
