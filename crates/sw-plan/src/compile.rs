//! Compilation entry points

use crate::capability::CapabilityRegistry;
use crate::error::PlanResult;
use crate::expr::TableExpr;
use crate::lowering::{lower, LowerOptions, LoweredFragment};

/// Compile an expression for the backend named `backend`
pub fn compile(
    expr: &TableExpr,
    backend: &str,
    registry: &CapabilityRegistry,
    options: &LowerOptions,
) -> PlanResult<LoweredFragment> {
    let caps = registry.get(backend)?;
    lower(expr, caps, options)
}

/// Compile the same expression for several backends, one thread each.
///
/// Results are returned in the order of `backends`.
pub fn compile_for_backends<'b>(
    expr: &TableExpr,
    backends: &[&'b str],
    registry: &CapabilityRegistry,
    options: &LowerOptions,
) -> Vec<(&'b str, PlanResult<LoweredFragment>)> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = backends
            .iter()
            .map(|&backend| {
                (
                    backend,
                    scope.spawn(move || compile(expr, backend, registry, options)),
                )
            })
            .collect();
        handles
            .into_iter()
            .map(|(backend, handle)| {
                let result = handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
                (backend, result)
            })
            .collect()
    })
}

#[cfg(test)]
#[path = "compile_test.rs"]
mod tests;
