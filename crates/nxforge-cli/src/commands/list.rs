//! `nxforge list`: print the generator catalogue.

use nxforge_core::prelude::*;

use crate::{
    cli::{ListArgs, ListFormat},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, output: OutputManager) -> CliResult<()> {
    let catalog = CatalogService::new();
    let generators = match args.language {
        Some(language) => catalog.by_language(language.prefix()),
        None => catalog.list(),
    };

    match args.format {
        ListFormat::Table => {
            output.header("Available generators:")?;
            let width = generators.iter().map(|g| g.id.len()).max().unwrap_or(0);
            for generator in &generators {
                output.print(&format!(
                    "  {:<width$}  {}",
                    generator.id, generator.description
                ))?;
            }
        }

        // JSON must stay parseable when piped, so it ignores --quiet.
        ListFormat::Json => {
            let value = serde_json::to_value(&generators).map_err(std::io::Error::other)?;
            output.json(&value)?;
        }

        ListFormat::List => {
            for generator in &generators {
                println!("{}", generator.id);
            }
        }

        ListFormat::Csv => {
            println!("id,language,name,description");
            for generator in &generators {
                println!(
                    "{},{},{},{}",
                    generator.id,
                    generator.language,
                    generator.name,
                    csv_field(&generator.description)
                );
            }
        }
    }

    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
