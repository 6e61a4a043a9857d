//! Set-operation normalization: flatten nested chains into one step list

use crate::chain::OperationChain;
use crate::expr::{TableExpr, TableNode};
use sw_core::{Multiplicity, Schema, SetOpKind};

/// One flattened step: apply `kind`/`multiplicity` with `operand` to the
/// accumulated left side
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedStep<'a> {
    pub kind: SetOpKind,
    pub multiplicity: Multiplicity,
    pub operand: &'a TableExpr,
}

/// Flat, left-to-right operation sequence; operand 0 is the base
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedChain<'a> {
    base: &'a TableExpr,
    steps: Vec<NormalizedStep<'a>>,
    schema: &'a Schema,
}

impl<'a> NormalizedChain<'a> {
    /// Leftmost operand
    pub fn base(&self) -> &'a TableExpr {
        self.base
    }

    /// Steps in evaluation order
    pub fn steps(&self) -> &[NormalizedStep<'a>] {
        &self.steps
    }

    /// Output schema of the whole chain
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// All operands, base first
    pub fn operands(&self) -> Vec<&'a TableExpr> {
        std::iter::once(self.base)
            .chain(self.steps.iter().map(|s| s.operand))
            .collect()
    }

    /// `(kind, multiplicity)` of each step in order
    pub fn signature(&self) -> Vec<(SetOpKind, Multiplicity)> {
        self.steps
            .iter()
            .map(|s| (s.kind, s.multiplicity))
            .collect()
    }
}

/// Result of normalizing a table expression
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized<'a> {
    /// Not a set operation; lowered as the expression itself
    Identity(&'a TableExpr),
    /// Two or more operands
    Chain(NormalizedChain<'a>),
}

/// Normalize an expression.
///
/// A chain whose base is itself a chain is flattened along the left spine,
/// so `a.union(b).union(c)` and `union(a, [b, c])` yield the same steps.
/// Chains behind a sort or limit, and chains used as right-hand operands,
/// stay opaque operands.
pub fn normalize(expr: &TableExpr) -> Normalized<'_> {
    match expr.node() {
        TableNode::SetOp(chain) => Normalized::Chain(flatten(chain)),
        _ => Normalized::Identity(expr),
    }
}

fn flatten(chain: &OperationChain) -> NormalizedChain<'_> {
    let mut flat = match chain.base().node() {
        TableNode::SetOp(inner) => flatten(inner),
        _ => NormalizedChain {
            base: chain.base(),
            steps: Vec::with_capacity(chain.steps().len()),
            schema: chain.schema(),
        },
    };
    flat.steps
        .extend(chain.steps().iter().map(|step| NormalizedStep {
            kind: step.kind,
            multiplicity: step.multiplicity,
            operand: &step.operand,
        }));
    flat.schema = chain.schema();
    flat
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
