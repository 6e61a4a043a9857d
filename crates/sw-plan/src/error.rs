//! Error types for sw-plan

use sw_core::{BackendName, Multiplicity, Schema, SetOpKind, SqlType};
use thiserror::Error;

/// Why two operand schemas cannot be combined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchReason {
    /// The operand declares no columns at all
    NoColumns,
    /// Columns of the leftmost operand missing from this operand
    MissingColumns(Vec<String>),
    /// Columns of this operand that the leftmost operand does not have
    ExtraColumns(Vec<String>),
    /// A column's types have no lossless common type
    IncompatibleType {
        column: String,
        expected: SqlType,
        found: SqlType,
    },
}

impl std::fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MismatchReason::NoColumns => write!(f, "operand has no columns"),
            MismatchReason::MissingColumns(cols) => {
                write!(f, "missing column(s) {}", cols.join(", "))
            }
            MismatchReason::ExtraColumns(cols) => {
                write!(f, "unexpected column(s) {}", cols.join(", "))
            }
            MismatchReason::IncompatibleType {
                column,
                expected,
                found,
            } => write!(
                f,
                "column '{column}' has type {found}, which is not compatible with {expected}"
            ),
        }
    }
}

/// Set-operation compilation error
///
/// These use the `P` prefix (Plan); lowering diagnostics use `L` codes.
#[derive(Error, Debug)]
pub enum PlanError {
    /// P001: Operand schemas cannot be reconciled
    #[error("[P001] Schema mismatch in operand {operand}: {reason}; expected {expected}, found {found}")]
    SchemaMismatch {
        operand: usize,
        expected: Schema,
        found: Schema,
        reason: MismatchReason,
    },

    /// P002: Backend cannot express the requested operation
    #[error("[P002] Backend '{backend}' does not support {kind} {multiplicity}")]
    UnsupportedOperation {
        backend: BackendName,
        kind: SetOpKind,
        multiplicity: Multiplicity,
    },

    /// P003: Operand ordering rejected under the strict order policy
    #[error("[P003] Backend '{backend}' does not support ORDER BY inside set-operation operand {operand}")]
    UnsupportedSubqueryOrder { backend: BackendName, operand: usize },

    /// P004: Backend id not present in the capability registry
    #[error("[P004] Unknown backend '{0}'")]
    UnknownBackend(String),

    /// P005: Sort key references a column the input does not have
    #[error("[P005] Cannot order by unknown column '{column}' (available: {available})")]
    UnknownColumn { column: String, available: String },

    /// P006: Core error propagation
    #[error("[P006] Core error: {0}")]
    Core(#[from] sw_core::CoreError),

    /// P007: SQL crate error propagation
    #[error("[P007] SQL error: {0}")]
    Sql(#[from] sw_sql::SqlError),
}

/// Result type alias for PlanError
pub type PlanResult<T> = Result<T, PlanError>;
