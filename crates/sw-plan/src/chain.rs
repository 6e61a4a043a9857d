//! Operation chains: left-associative sequences of set operations

use crate::error::PlanResult;
use crate::expr::TableExpr;
use crate::reconcile::reconcile;
use sw_core::{Multiplicity, Schema, SetOpKind};

/// One set operation applied to the accumulated left side
#[derive(Debug, Clone, PartialEq)]
pub struct SetOpStep {
    /// Operation kind
    pub kind: SetOpKind,
    /// DISTINCT or ALL
    pub multiplicity: Multiplicity,
    /// Right-hand operand
    pub operand: TableExpr,
}

/// Base table plus steps, evaluated in construction order.
///
/// Only [`OperationChainBuilder::build`] creates chains, and it refuses
/// operands whose schemas do not reconcile, so every chain is well-typed.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationChain {
    base: TableExpr,
    steps: Vec<SetOpStep>,
    schema: Schema,
}

impl OperationChain {
    /// Start building a chain on `base`
    pub fn builder(base: TableExpr) -> OperationChainBuilder {
        OperationChainBuilder::new(base)
    }

    /// Leftmost operand
    pub fn base(&self) -> &TableExpr {
        &self.base
    }

    /// Steps in evaluation order
    pub fn steps(&self) -> &[SetOpStep] {
        &self.steps
    }

    /// Canonical output schema (leftmost operand's column order, widened types)
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Explicit builder for [`OperationChain`]
#[derive(Debug, Clone)]
pub struct OperationChainBuilder {
    base: TableExpr,
    steps: Vec<SetOpStep>,
}

impl OperationChainBuilder {
    /// Start a chain on `base`
    pub fn new(base: TableExpr) -> Self {
        Self {
            base,
            steps: Vec::new(),
        }
    }

    /// Append a step
    pub fn push(mut self, kind: SetOpKind, multiplicity: Multiplicity, operand: TableExpr) -> Self {
        self.steps.push(SetOpStep {
            kind,
            multiplicity,
            operand,
        });
        self
    }

    /// Finish the chain.
    ///
    /// Without steps this is the identity and returns the base expression
    /// itself; otherwise all operand schemas must reconcile.
    pub fn build(self) -> PlanResult<TableExpr> {
        if self.steps.is_empty() {
            return Ok(self.base);
        }

        let schemas: Vec<&Schema> = std::iter::once(self.base.schema())
            .chain(self.steps.iter().map(|s| s.operand.schema()))
            .collect();
        let schema = reconcile(&schemas)?.into_canonical();

        Ok(TableExpr::set_op(OperationChain {
            base: self.base,
            steps: self.steps,
            schema,
        }))
    }
}
