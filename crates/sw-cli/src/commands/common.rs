//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;
use sw_core::{Config, OrderPolicy};
use sw_plan::CapabilityRegistry;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run before the process ends.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Empty: main() handles ExitCode without printing it.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load the capability override file, if any.
///
/// `--capabilities` wins; otherwise `setwise.yml` / `setwise.yaml` in the
/// project directory is used when present.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Option<Config>> {
    if let Some(path) = &global.capabilities {
        log::debug!("Loading capability file {}", path);
        let config = Config::load(Path::new(path))
            .with_context(|| format!("Failed to load capability file: {path}"))?;
        return Ok(Some(config));
    }

    let dir = Path::new(&global.project_dir);
    if !dir.join("setwise.yml").exists() && !dir.join("setwise.yaml").exists() {
        return Ok(None);
    }
    log::debug!("Loading capability file from {}", dir.display());
    let config = Config::load_from_dir(dir)
        .with_context(|| format!("Failed to load setwise.yml from {}", dir.display()))?;
    Ok(Some(config))
}

/// Effective registry and order policy for this invocation
pub(crate) fn load_registry(global: &GlobalArgs) -> Result<(CapabilityRegistry, OrderPolicy)> {
    let config = load_config(global)?.unwrap_or_default();
    if global.verbose && !config.backends.is_empty() {
        eprintln!(
            "[verbose] Applying capability overrides for: {}",
            config
                .backends
                .keys()
                .map(|name| name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    let registry = CapabilityRegistry::with_config(&config)
        .context("Invalid capability overrides")?;
    Ok((registry, config.order_policy))
}

/// Render rows as a left-aligned text table with a dashed separator
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.len())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    let render = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|width| format!("{:-<width$}", ""))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(render(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
