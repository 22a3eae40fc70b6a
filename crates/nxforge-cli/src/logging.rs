//! Log subscriber setup for the `nxforge` binary.
//!
//! Library crates only emit events. Here they are filtered by `-v` / `-q`
//! and written to stderr, leaving stdout to command output. A set
//! `RUST_LOG` replaces the flag-derived filter entirely.

use std::io::IsTerminal as _;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

const TARGETS: [&str; 3] = ["nxforge", "nxforge_core", "nxforge_adapters"];

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(filter_directives(level_for(args))),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}

fn filter_directives(level: LevelFilter) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// `--quiet` wins; otherwise each `-v` raises the level one step from WARN.
fn level_for(args: &GlobalArgs) -> LevelFilter {
    if args.quiet {
        return LevelFilter::ERROR;
    }
    match args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn args_with(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
            workspace: None,
            output_format: OutputFormat::Auto,
        }
    }

    #[test]
    fn verbosity_flags_select_level() {
        let cases = [
            (0, false, LevelFilter::WARN),
            (1, false, LevelFilter::INFO),
            (2, false, LevelFilter::DEBUG),
            (3, false, LevelFilter::TRACE),
            (10, false, LevelFilter::TRACE),
            (0, true, LevelFilter::ERROR),
            (3, true, LevelFilter::ERROR),
        ];
        for (verbose, quiet, expected) in cases {
            assert_eq!(
                level_for(&args_with(verbose, quiet)),
                expected,
                "verbose={verbose} quiet={quiet}"
            );
        }
    }

    #[test]
    fn directives_cover_every_crate() {
        assert_eq!(
            filter_directives(LevelFilter::DEBUG).to_lowercase(),
            "nxforge=debug,nxforge_core=debug,nxforge_adapters=debug"
        );
    }
}
