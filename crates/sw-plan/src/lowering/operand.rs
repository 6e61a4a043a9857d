//! Operand projection

use super::Lowerer;
use crate::diagnostics::Diagnostic;
use crate::error::{PlanError, PlanResult};
use crate::expr::{TableExpr, TableNode, TableSource};
use crate::reconcile::Reconciliation;
use sw_core::OrderPolicy;
use sw_sql::SelectWrap;

impl Lowerer<'_> {
    /// Render operand `index` as `SELECT <canonical columns> FROM <source>`.
    ///
    /// Columns are read by name in canonical order; narrower columns are
    /// cast to the canonical type.
    pub(super) fn lower_operand(
        &mut self,
        operand: &TableExpr,
        index: usize,
        reconciliation: &Reconciliation,
    ) -> PlanResult<String> {
        let from = match operand.node() {
            TableNode::Source {
                source: TableSource::Table(name),
                ..
            } => {
                let alias = self.fresh_alias();
                self.dialect
                    .table_alias(&self.dialect.quote_qualified(name), &alias)
            }
            TableNode::Sort { input, .. } if !self.caps.subquery_order_supported => {
                let unordered = self.drop_operand_order(input, index)?;
                let inner = self.lower_expr(unordered)?;
                self.derived(&inner)
            }
            _ => {
                let inner = self.lower_expr(operand)?;
                self.derived(&inner)
            }
        };

        let canonical = reconciliation.canonical();
        let input_columns = operand.schema().columns();
        let mut projection = Vec::with_capacity(canonical.len());
        for (pos, col) in canonical.columns().iter().enumerate() {
            let name = self.dialect.quote_ident(&col.name);
            if reconciliation.needs_cast(index, pos) {
                let declared = &input_columns[reconciliation.projection(index)[pos]].sql_type;
                self.diagnostics.push(Diagnostic::widened(
                    index,
                    &col.name,
                    &declared.to_string(),
                    &col.sql_type.to_string(),
                ));
                projection.push(format!(
                    "CAST({name} AS {}) AS {name}",
                    self.dialect.cast_type(&col.sql_type)
                ));
            } else {
                projection.push(name);
            }
        }

        Ok(self.dialect.render_select(&SelectWrap {
            projection: &projection.join(", "),
            from: &from,
            ..Default::default()
        }))
    }

    /// Apply the order policy to an ordered operand on a backend that
    /// rejects ORDER BY in subqueries; returns the operand without its sorts
    fn drop_operand_order<'e>(
        &mut self,
        mut input: &'e TableExpr,
        index: usize,
    ) -> PlanResult<&'e TableExpr> {
        if self.options.order_policy == OrderPolicy::Strict {
            return Err(PlanError::UnsupportedSubqueryOrder {
                backend: self.caps.name.clone(),
                operand: index,
            });
        }
        while let TableNode::Sort { input: inner, .. } = input.node() {
            input = inner;
        }
        log::warn!(
            "Dropping ORDER BY on operand {} for backend '{}'; order the combined result instead",
            index,
            self.caps.name
        );
        self.diagnostics
            .push(Diagnostic::order_dropped(&self.caps.name, index));
        Ok(input)
    }
}
