//! Compile command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use sw_core::OrderPolicy;
use sw_plan::{compile_for_backends, LowerOptions, LoweredFragment, Severity};
use sw_sql::dialect_for;

use crate::cli::{CompileArgs, CompileOutput, GlobalArgs};
use crate::commands::common::{load_registry, ExitCode};
use crate::plan::PlanFile;

/// Outcome for one backend
#[derive(Debug, Serialize)]
struct CompileResult<'a> {
    backend: &'a str,
    status: CompileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    fragment: Option<&'a LoweredFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum CompileStatus {
    Success,
    Error,
}

/// Execute the compile command
pub(crate) fn execute(args: &CompileArgs, global: &GlobalArgs) -> Result<()> {
    let plan = PlanFile::load(Path::new(&args.plan))?;
    let expr = plan
        .build()
        .with_context(|| format!("Failed to build plan: {}", args.plan))?;

    let (registry, configured_policy) = load_registry(global)?;
    let policy = if args.strict_order {
        OrderPolicy::Strict
    } else {
        configured_policy
    };
    let options = LowerOptions::with_order_policy(policy);

    if global.verbose {
        eprintln!(
            "[verbose] Compiling {} for {} backend(s), order policy: {}",
            args.plan,
            args.backend.len(),
            policy
        );
    }

    let backends: Vec<&str> = args.backend.iter().map(String::as_str).collect();
    let compiled = compile_for_backends(&expr, &backends, &registry, &options);

    let mut results = Vec::with_capacity(compiled.len());
    for (backend, outcome) in &compiled {
        let checked = outcome.as_ref().map_err(|e| e.to_string()).and_then(|frag| {
            if args.check {
                check_sql(frag)?;
            }
            Ok(frag)
        });
        results.push(match checked {
            Ok(frag) => CompileResult {
                backend: *backend,
                status: CompileStatus::Success,
                fragment: Some(frag),
                error: None,
            },
            Err(error) => CompileResult {
                backend: *backend,
                status: CompileStatus::Error,
                fragment: None,
                error: Some(error),
            },
        });
    }

    match args.output {
        CompileOutput::Sql => print_sql(&results, global.verbose),
        CompileOutput::Json => {
            let json = serde_json::to_string_pretty(&results)
                .context("Failed to serialize compile results")?;
            println!("{json}");
        }
    }

    if results.iter().any(|r| r.status == CompileStatus::Error) {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

/// Parse the generated SQL in the fragment's own dialect
fn check_sql(frag: &LoweredFragment) -> std::result::Result<(), String> {
    dialect_for(frag.dialect())
        .parse(frag.sql())
        .map(|_| ())
        .map_err(|e| format!("generated SQL does not parse as {}: {e}", frag.dialect()))
}

fn print_sql(results: &[CompileResult<'_>], verbose: bool) {
    let labelled = results.len() > 1;
    for result in results {
        if let Some(error) = &result.error {
            eprintln!("Error [{}]: {}", result.backend, error);
            continue;
        }
        let Some(frag) = result.fragment else {
            continue;
        };
        if labelled {
            println!("-- backend: {}", frag.backend());
        }
        println!("{}", frag.sql());
        if labelled {
            println!();
        }

        if verbose {
            for (i, step) in frag.steps().iter().enumerate() {
                eprintln!(
                    "[verbose] {} step {}: {} {} -> {} ({})",
                    frag.backend(),
                    i + 1,
                    step.kind,
                    step.multiplicity,
                    step.operator,
                    step.support
                );
            }
        }
        for diag in frag.diagnostics() {
            if verbose || diag.severity == Severity::Warning {
                eprintln!("{}: {}", frag.backend(), diag);
            }
        }
    }
}
