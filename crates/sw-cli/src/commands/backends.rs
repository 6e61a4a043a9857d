//! Backends command implementation

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::{BackendsArgs, GlobalArgs, TableOutput};
use crate::commands::common::{format_table, load_registry};

#[derive(Debug, Serialize)]
struct BackendEntry {
    name: String,
    dialect: String,
}

/// Execute the backends command
pub(crate) fn execute(args: &BackendsArgs, global: &GlobalArgs) -> Result<()> {
    let (registry, _) = load_registry(global)?;
    let entries: Vec<BackendEntry> = registry
        .backends()
        .map(|caps| BackendEntry {
            name: caps.name.to_string(),
            dialect: caps.dialect.to_string(),
        })
        .collect();

    match args.output {
        TableOutput::Table => {
            let rows: Vec<Vec<String>> = entries
                .iter()
                .map(|e| vec![e.name.clone(), e.dialect.clone()])
                .collect();
            println!("{}", format_table(&["BACKEND", "DIALECT"], &rows));
            println!("\n{} backends", entries.len());
        }
        TableOutput::Json => {
            let json = serde_json::to_string_pretty(&entries)
                .context("Failed to serialize backend list")?;
            println!("{json}");
        }
    }
    Ok(())
}
