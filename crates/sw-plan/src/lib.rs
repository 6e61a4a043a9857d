//! sw-plan - Set-operation compiler for Setwise
//!
//! Builds table expressions combined with UNION / INTERSECT / EXCEPT,
//! reconciles operand schemas by column name, flattens operation chains,
//! checks each step against a backend's capability table, and lowers the
//! result to that backend's SQL dialect.

pub mod capability;
pub mod chain;
pub mod compile;
pub mod diagnostics;
pub mod error;
pub mod expr;
pub mod lowering;
pub mod normalize;
pub mod reconcile;

pub use capability::{BackendCapabilities, CapabilityRegistry, EmulationStrategy, Support};
pub use chain::{OperationChain, OperationChainBuilder, SetOpStep};
pub use compile::{compile, compile_for_backends};
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use error::{MismatchReason, PlanError, PlanResult};
pub use expr::{difference, intersect, union, SortKey, TableExpr, TableNode, TableSource};
pub use lowering::{lower, LowerOptions, LoweredFragment, LoweredStep};
pub use normalize::{normalize, Normalized, NormalizedChain, NormalizedStep};
pub use reconcile::{reconcile, Reconciliation};

#[cfg(test)]
pub(crate) mod test_utils;
