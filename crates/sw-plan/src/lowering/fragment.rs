//! Lowered output

use crate::capability::Support;
use crate::diagnostics::{Diagnostic, Severity};
use serde::Serialize;
use sw_core::{BackendName, DialectKind, Multiplicity, Schema, SetOpKind};

/// How one step of a chain was lowered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoweredStep {
    pub kind: SetOpKind,
    pub multiplicity: Multiplicity,
    /// Operator token actually emitted (`UNION ALL`, `INTERSECT`, ...)
    pub operator: String,
    /// Capability entry used
    pub support: Support,
}

/// Backend-specific SQL for one compiled expression
#[derive(Debug, Clone, Serialize)]
pub struct LoweredFragment {
    pub(crate) backend: BackendName,
    pub(crate) dialect: DialectKind,
    pub(crate) sql: String,
    pub(crate) steps: Vec<LoweredStep>,
    pub(crate) schema: Schema,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl LoweredFragment {
    /// Target backend
    pub fn backend(&self) -> &BackendName {
        &self.backend
    }

    /// Dialect the SQL is written in
    pub fn dialect(&self) -> DialectKind {
        self.dialect
    }

    /// The SQL text
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Per-step lowering record, in lowering order
    pub fn steps(&self) -> &[LoweredStep] {
        &self.steps
    }

    /// Output schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Diagnostics recorded while lowering
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether any warning was recorded
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    /// Whether no set operation was lowered
    pub fn is_identity(&self) -> bool {
        self.steps.is_empty()
    }

    /// Consume into the SQL text
    pub fn into_sql(self) -> String {
        self.sql
    }
}

impl std::fmt::Display for LoweredFragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}
