//! Dialect lowering: normalized set-operation chains to backend SQL

mod emulate;
mod fragment;
mod operand;

pub use fragment::{LoweredFragment, LoweredStep};

use crate::capability::{BackendCapabilities, EmulationStrategy, Support};
use crate::diagnostics::Diagnostic;
use crate::error::PlanResult;
use crate::expr::{SortKey, TableExpr, TableNode, TableSource};
use crate::normalize::{normalize, Normalized, NormalizedChain};
use crate::reconcile::reconcile;
use std::collections::HashSet;
use sw_core::{OrderPolicy, Schema, SetOpKind};
use sw_sql::{dialect_for, SelectWrap, SqlDialect};

/// Lowering options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LowerOptions {
    /// Handling of operand ORDER BY on backends that reject it
    pub order_policy: OrderPolicy,
}

impl LowerOptions {
    /// Options with the given order policy
    pub fn with_order_policy(order_policy: OrderPolicy) -> Self {
        Self { order_policy }
    }
}

/// Lower an expression for one backend.
///
/// Every step is checked against the backend's capability table before any
/// SQL is produced for the chain it belongs to.
pub fn lower(
    expr: &TableExpr,
    caps: &BackendCapabilities,
    options: &LowerOptions,
) -> PlanResult<LoweredFragment> {
    let mut lowerer = Lowerer::new(caps, options, expr);
    let sql = lowerer.lower_expr(expr)?;
    log::debug!(
        "Lowered {} step(s) for backend '{}' ({} diagnostic(s))",
        lowerer.steps.len(),
        caps.name,
        lowerer.diagnostics.len()
    );
    Ok(LoweredFragment {
        backend: caps.name.clone(),
        dialect: caps.dialect,
        sql,
        steps: lowerer.steps,
        schema: expr.schema().clone(),
        diagnostics: lowerer.diagnostics,
    })
}

/// Single-pass lowering state
pub(crate) struct Lowerer<'a> {
    caps: &'a BackendCapabilities,
    dialect: &'static dyn SqlDialect,
    options: &'a LowerOptions,
    /// Every column name in the expression tree; generated names avoid them
    reserved: HashSet<String>,
    next_alias: usize,
    steps: Vec<LoweredStep>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lowerer<'a> {
    fn new(caps: &'a BackendCapabilities, options: &'a LowerOptions, expr: &TableExpr) -> Self {
        let mut reserved = HashSet::new();
        collect_column_names(expr, &mut reserved);
        Self {
            caps,
            dialect: dialect_for(caps.dialect),
            options,
            reserved,
            next_alias: 0,
            steps: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Fresh `_sw_N` name, quoted
    pub(crate) fn fresh_alias(&mut self) -> String {
        loop {
            let name = format!("_sw_{}", self.next_alias);
            self.next_alias += 1;
            if !self.reserved.contains(&name) {
                return self.dialect.quote_ident(&name);
            }
        }
    }

    /// Render `(<sql>) AS <fresh alias>`, in the dialect's alias syntax
    pub(crate) fn derived(&mut self, sql: &str) -> String {
        let alias = self.fresh_alias();
        self.dialect.table_alias(&format!("({sql})"), &alias)
    }

    /// Comma-separated, quoted column list of a schema
    pub(crate) fn column_list(&self, schema: &Schema) -> String {
        schema
            .columns()
            .iter()
            .map(|c| self.dialect.quote_ident(&c.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn order_list(&self, keys: &[SortKey]) -> String {
        keys.iter()
            .map(|k| {
                let col = self.dialect.quote_ident(&k.column);
                if k.ascending {
                    format!("{col} ASC")
                } else {
                    format!("{col} DESC")
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Lower any expression to a standalone query
    pub(crate) fn lower_expr(&mut self, expr: &TableExpr) -> PlanResult<String> {
        match normalize(expr) {
            Normalized::Chain(chain) => self.lower_chain(&chain),
            Normalized::Identity(expr) => self.lower_relation(expr),
        }
    }

    /// Lower a non-chain expression
    fn lower_relation(&mut self, expr: &TableExpr) -> PlanResult<String> {
        match expr.node() {
            TableNode::Source {
                source: TableSource::Table(name),
                schema,
            } => Ok(self.dialect.render_select(&SelectWrap {
                projection: &self.column_list(schema),
                from: &self.dialect.quote_qualified(name),
                ..Default::default()
            })),
            TableNode::Source {
                source: TableSource::Query(sql),
                ..
            } => Ok(source_text(sql)),
            TableNode::SetOp(_) => self.lower_expr(expr),
            TableNode::Sort { input, keys } => self.wrap(input, keys, None, None),
            TableNode::Limit {
                input,
                limit,
                offset,
            } => match input.node() {
                TableNode::Sort { input, keys } => self.wrap(input, keys, *limit, *offset),
                _ => self.wrap(input, &[], *limit, *offset),
            },
        }
    }

    /// `SELECT * FROM (<input>) AS alias [ORDER BY ..] [LIMIT ..]`
    fn wrap(
        &mut self,
        input: &TableExpr,
        keys: &[SortKey],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> PlanResult<String> {
        // An inner ORDER BY directly under another is superseded by it
        let input = match input.node() {
            TableNode::Sort { input: inner, .. } if !keys.is_empty() => inner,
            _ => input,
        };
        let inner = self.lower_expr(input)?;
        let from = self.derived(&inner);
        let order_by = (!keys.is_empty()).then(|| self.order_list(keys));
        log::debug!(
            "Wrapping relation: {} sort key(s), limit {:?}, offset {:?}",
            keys.len(),
            limit,
            offset
        );
        Ok(self.dialect.render_select(&SelectWrap {
            projection: "*",
            from: &from,
            order_by: order_by.as_deref(),
            limit,
            offset,
            ..Default::default()
        }))
    }

    /// Lower a flattened chain of two or more operands
    fn lower_chain(&mut self, chain: &NormalizedChain<'_>) -> PlanResult<String> {
        let operands = chain.operands();
        let schemas: Vec<&Schema> = operands.iter().map(|o| o.schema()).collect();
        let reconciliation = reconcile(&schemas)?;
        let canonical = reconciliation.canonical();

        let supports = chain
            .steps()
            .iter()
            .map(|step| self.caps.resolve(step.kind, step.multiplicity))
            .collect::<PlanResult<Vec<_>>>()?;

        let mut rendered = Vec::with_capacity(operands.len());
        for (index, operand) in operands.iter().enumerate() {
            rendered.push(self.lower_operand(operand, index, &reconciliation)?);
        }
        let mut rendered = rendered.into_iter();
        let mut acc = rendered.next().unwrap_or_default();
        // Whether `acc` is a bare compound with UNION or EXCEPT at top level
        let mut loose = false;

        for ((step, support), right) in chain.steps().iter().zip(supports).zip(rendered) {
            let (sql, operator) = match support {
                Support::Native => {
                    let left = if step.kind == SetOpKind::Intersect && loose {
                        log::debug!("Wrapping left side of INTERSECT to keep evaluation order");
                        self.wrap_columns(&acc, canonical)
                    } else {
                        acc
                    };
                    let operator = self.dialect.set_operator(step.kind, step.multiplicity);
                    loose |= step.kind != SetOpKind::Intersect;
                    (format!("{left} {operator} {right}"), operator)
                }
                Support::Emulated(strategy) => {
                    self.diagnostics.push(Diagnostic::emulated(format!(
                        "{} {} emulated on backend '{}' using {}",
                        step.kind, step.multiplicity, self.caps.name, strategy
                    )));
                    log::debug!(
                        "Emulating {} {} with {}",
                        step.kind,
                        step.multiplicity,
                        strategy
                    );
                    loose = false;
                    match strategy {
                        EmulationStrategy::RowNumber => {
                            emulate::row_number(self, step.kind, &acc, &right, canonical)
                        }
                        EmulationStrategy::DistinctOverUnionAll => {
                            emulate::distinct_over_union_all(self, &acc, &right, canonical)
                        }
                    }
                }
                Support::Unsupported => {
                    return Err(crate::error::PlanError::UnsupportedOperation {
                        backend: self.caps.name.clone(),
                        kind: step.kind,
                        multiplicity: step.multiplicity,
                    })
                }
            };
            self.steps.push(LoweredStep {
                kind: step.kind,
                multiplicity: step.multiplicity,
                operator,
                support,
            });
            acc = sql;
        }
        Ok(acc)
    }

    /// `SELECT <cols> FROM (<sql>) AS alias`
    pub(crate) fn wrap_columns(&mut self, sql: &str, schema: &Schema) -> String {
        let from = self.derived(sql);
        self.dialect.render_select(&SelectWrap {
            projection: &self.column_list(schema),
            from: &from,
            ..Default::default()
        })
    }

    /// Name for a helper column that no user column uses
    pub(crate) fn helper_column(&self, base: &str) -> String {
        let mut name = base.to_string();
        let mut n = 0;
        while self.reserved.contains(&name) {
            n += 1;
            name = format!("{base}_{n}");
        }
        name
    }

    pub(crate) fn dialect(&self) -> &'static dyn SqlDialect {
        self.dialect
    }
}

/// SQL source text without its trailing `;`.
///
/// A trailing `--` comment would swallow whatever follows on the same line,
/// so the text then ends with a newline.
fn source_text(sql: &str) -> String {
    let text = sql.trim().trim_end_matches(';').trim_end();
    match text.lines().last() {
        Some(last) if last.contains("--") => format!("{text}\n"),
        _ => text.to_string(),
    }
}

fn collect_column_names(expr: &TableExpr, names: &mut HashSet<String>) {
    names.extend(expr.schema().columns().iter().map(|c| c.name.clone()));
    match expr.node() {
        TableNode::Source { .. } => {}
        TableNode::SetOp(chain) => {
            collect_column_names(chain.base(), names);
            for step in chain.steps() {
                collect_column_names(&step.operand, names);
            }
        }
        TableNode::Sort { input, .. } | TableNode::Limit { input, .. } => {
            collect_column_names(input, names)
        }
    }
}

#[cfg(test)]
#[path = "lowering_test.rs"]
mod tests;
