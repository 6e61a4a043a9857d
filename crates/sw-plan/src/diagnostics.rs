//! Lowering diagnostics

use serde::Serialize;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational: no action required
    Info,
    /// Warning: result may differ from what the caller expects
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Stable diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    /// L001: operand ORDER BY dropped for a backend that rejects it
    L001,
    /// L002: operation lowered through an emulation
    L002,
    /// L003: operand column cast to a wider canonical type
    L003,
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticCode::L001 => write!(f, "L001"),
            DiagnosticCode::L002 => write!(f, "L002"),
            DiagnosticCode::L003 => write!(f, "L003"),
        }
    }
}

/// A diagnostic recorded while lowering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Diagnostic code
    pub code: DiagnosticCode,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Operand index within the flattened chain, when it concerns one
    pub operand: Option<usize>,
    /// Optional hint for how to fix
    pub hint: Option<String>,
}

impl Diagnostic {
    pub(crate) fn order_dropped(backend: &str, operand: usize) -> Self {
        Self {
            code: DiagnosticCode::L001,
            severity: Severity::Warning,
            message: format!(
                "ORDER BY on operand {operand} dropped: backend '{backend}' rejects ORDER BY inside set-operation subqueries"
            ),
            operand: Some(operand),
            hint: Some("Apply order_by to the combined result instead".to_string()),
        }
    }

    pub(crate) fn emulated(message: String) -> Self {
        Self {
            code: DiagnosticCode::L002,
            severity: Severity::Info,
            message,
            operand: None,
            hint: None,
        }
    }

    pub(crate) fn widened(operand: usize, column: &str, from: &str, to: &str) -> Self {
        Self {
            code: DiagnosticCode::L003,
            severity: Severity::Info,
            message: format!("Operand {operand} column '{column}' cast from {from} to {to}"),
            operand: Some(operand),
            hint: None,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.severity, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}
