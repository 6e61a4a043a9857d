//! Table expressions: immutable handles to relational computations

use crate::chain::OperationChain;
use crate::error::{PlanError, PlanResult};
use std::sync::Arc;
use sw_core::{Multiplicity, Schema, SetOpKind};

/// Where a source relation's rows come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// Named table or view, optionally schema-qualified (`raw.orders`)
    Table(String),
    /// SQL query text, used verbatim as a derived table
    Query(String),
}

/// Sort key for ORDER BY
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Column to sort by
    pub column: String,
    /// Ascending (true) or descending (false)
    pub ascending: bool,
}

impl SortKey {
    /// Ascending sort on a column
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    /// Descending sort on a column
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// Node of a table expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TableNode {
    /// Source relation with its declared schema
    Source { source: TableSource, schema: Schema },
    /// Set-operation chain over two or more operands
    SetOp(OperationChain),
    /// Ordering applied to an input
    Sort { input: TableExpr, keys: Vec<SortKey> },
    /// Row limiting applied to an input
    Limit {
        input: TableExpr,
        limit: Option<u64>,
        offset: Option<u64>,
    },
}

/// Immutable, cheaply clonable handle to a relational computation.
///
/// Cloning shares the underlying node; set operations reference their
/// operands through these handles rather than copying them.
#[derive(Debug, Clone, PartialEq)]
pub struct TableExpr {
    node: Arc<TableNode>,
}

impl TableExpr {
    fn from_node(node: TableNode) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    /// A named table or view with a declared schema
    pub fn table(name: impl Into<String>, schema: Schema) -> Self {
        Self::from_node(TableNode::Source {
            source: TableSource::Table(name.into()),
            schema,
        })
    }

    /// A SQL query with a declared schema
    pub fn query(sql: impl Into<String>, schema: Schema) -> Self {
        Self::from_node(TableNode::Source {
            source: TableSource::Query(sql.into()),
            schema,
        })
    }

    pub(crate) fn set_op(chain: OperationChain) -> Self {
        Self::from_node(TableNode::SetOp(chain))
    }

    /// The expression's node
    pub fn node(&self) -> &TableNode {
        &self.node
    }

    /// Whether both handles share the same node
    pub fn ptr_eq(&self, other: &TableExpr) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Output schema
    pub fn schema(&self) -> &Schema {
        match self.node() {
            TableNode::Source { schema, .. } => schema,
            TableNode::SetOp(chain) => chain.schema(),
            TableNode::Sort { input, .. } | TableNode::Limit { input, .. } => input.schema(),
        }
    }

    /// Whether the outermost node is an ORDER BY
    pub fn is_ordered(&self) -> bool {
        matches!(self.node(), TableNode::Sort { .. })
    }

    /// Order the expression's rows.
    ///
    /// An empty key list returns the expression unchanged.
    pub fn order_by(&self, keys: Vec<SortKey>) -> PlanResult<TableExpr> {
        if keys.is_empty() {
            return Ok(self.clone());
        }
        let schema = self.schema();
        for key in &keys {
            if schema.find_column(&key.column).is_none() {
                return Err(PlanError::UnknownColumn {
                    column: key.column.clone(),
                    available: schema.column_names().join(", "),
                });
            }
        }
        Ok(Self::from_node(TableNode::Sort {
            input: self.clone(),
            keys,
        }))
    }

    /// Keep at most `n` rows
    pub fn limit(&self, n: u64) -> TableExpr {
        self.limit_offset(Some(n), 0)
    }

    /// Skip `offset` rows, then keep at most `limit` rows (all when `None`).
    ///
    /// With neither a limit nor an offset the expression is returned unchanged.
    pub fn limit_offset(&self, limit: Option<u64>, offset: u64) -> TableExpr {
        let offset = (offset > 0).then_some(offset);
        if limit.is_none() && offset.is_none() {
            return self.clone();
        }
        Self::from_node(TableNode::Limit {
            input: self.clone(),
            limit,
            offset,
        })
    }

    /// `self UNION other`
    pub fn union(&self, other: &TableExpr, multiplicity: Multiplicity) -> PlanResult<TableExpr> {
        combine(SetOpKind::Union, self, std::slice::from_ref(other), multiplicity)
    }

    /// `self INTERSECT other`
    pub fn intersect(
        &self,
        other: &TableExpr,
        multiplicity: Multiplicity,
    ) -> PlanResult<TableExpr> {
        combine(
            SetOpKind::Intersect,
            self,
            std::slice::from_ref(other),
            multiplicity,
        )
    }

    /// `self EXCEPT other`
    pub fn difference(
        &self,
        other: &TableExpr,
        multiplicity: Multiplicity,
    ) -> PlanResult<TableExpr> {
        combine(
            SetOpKind::Except,
            self,
            std::slice::from_ref(other),
            multiplicity,
        )
    }
}

/// Apply `kind` left to right: `first kind rest[0] kind rest[1] ...`.
///
/// With no further operands the result is `first` itself.
pub fn combine(
    kind: SetOpKind,
    first: &TableExpr,
    rest: &[TableExpr],
    multiplicity: Multiplicity,
) -> PlanResult<TableExpr> {
    rest.iter()
        .fold(OperationChain::builder(first.clone()), |builder, operand| {
            builder.push(kind, multiplicity, operand.clone())
        })
        .build()
}

/// Variadic UNION over `first` and `rest`
pub fn union(
    first: &TableExpr,
    rest: &[TableExpr],
    multiplicity: Multiplicity,
) -> PlanResult<TableExpr> {
    combine(SetOpKind::Union, first, rest, multiplicity)
}

/// Variadic INTERSECT over `first` and `rest`
pub fn intersect(
    first: &TableExpr,
    rest: &[TableExpr],
    multiplicity: Multiplicity,
) -> PlanResult<TableExpr> {
    combine(SetOpKind::Intersect, first, rest, multiplicity)
}

/// Variadic EXCEPT over `first` and `rest`, applied left to right
pub fn difference(
    first: &TableExpr,
    rest: &[TableExpr],
    multiplicity: Multiplicity,
) -> PlanResult<TableExpr> {
    combine(SetOpKind::Except, first, rest, multiplicity)
}

#[cfg(test)]
#[path = "expr_test.rs"]
mod tests;
