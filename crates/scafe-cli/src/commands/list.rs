//! Implementation of the `scafe list` command.

use scafe_adapters::catalog::{self, CatalogEntry};

use crate::{
    cli::{ListArgs, ListFormat},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, output: OutputManager) -> CliResult<()> {
    let entries: Vec<&CatalogEntry> = if args.optional {
        catalog::optional().collect()
    } else {
        catalog::CATALOG.iter().collect()
    };

    // `--output-format json` overrides the list format.
    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            output.header("Known packages:")?;
            let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
            for entry in &entries {
                output.print(&format!(
                    "  {:width$}  {:<11}  {:<8}  {}",
                    entry.name,
                    entry.group.as_str(),
                    catalog::feature_label(entry.feature),
                    entry.description,
                ))?;
            }
        }
        // JSON is printed even in quiet mode so it stays pipeable.
        ListFormat::Json => output.json(&entries)?,
        ListFormat::List => {
            for entry in &entries {
                output.print(entry.name)?;
            }
        }
        ListFormat::Csv => {
            output.print("name,group,feature,description")?;
            for entry in &entries {
                output.print(&csv_row(entry))?;
            }
        }
    }

    Ok(())
}

fn csv_row(entry: &CatalogEntry) -> String {
    let description = if entry.description.contains(',') || entry.description.contains('"') {
        format!("\"{}\"", entry.description.replace('"', "\"\""))
    } else {
        entry.description.to_string()
    };
    format!(
        "{},{},{},{}",
        entry.name,
        entry.group.as_str(),
        catalog::feature_label(entry.feature),
        description
    )
}
