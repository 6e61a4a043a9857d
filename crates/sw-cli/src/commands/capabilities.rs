//! Capabilities command implementation

use anyhow::{Context, Result};
use sw_plan::BackendCapabilities;

use crate::cli::{CapabilitiesArgs, GlobalArgs, TableOutput};
use crate::commands::common::{format_table, load_registry};

const HEADERS: [&str; 9] = [
    "BACKEND",
    "DIALECT",
    "UNION",
    "UNION ALL",
    "INTERSECT",
    "INTERSECT ALL",
    "EXCEPT",
    "EXCEPT ALL",
    "SUBQUERY ORDER",
];

/// Execute the capabilities command
pub(crate) fn execute(args: &CapabilitiesArgs, global: &GlobalArgs) -> Result<()> {
    let (registry, _) = load_registry(global)?;

    let selected: Vec<&BackendCapabilities> = match &args.backend {
        Some(name) => vec![registry.get(name)?],
        None => registry.backends().collect(),
    };

    match args.output {
        TableOutput::Table => println!("{}", capability_table(&selected)),
        TableOutput::Json => {
            let json = serde_json::to_string_pretty(&selected)
                .context("Failed to serialize capability table")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// One row per backend, one column per (kind, multiplicity) entry
pub(crate) fn capability_table(backends: &[&BackendCapabilities]) -> String {
    let rows: Vec<Vec<String>> = backends
        .iter()
        .map(|caps| {
            let mut row = vec![caps.name.to_string(), caps.dialect.to_string()];
            row.extend(caps.entries().iter().map(|(_, _, support)| support.to_string()));
            row.push(if caps.subquery_order_supported { "yes" } else { "no" }.to_string());
            row
        })
        .collect();
    format_table(&HEADERS, &rows)
}

#[cfg(test)]
#[path = "capabilities_test.rs"]
mod tests;
