//! YAML plan files: source tables plus a set-operation query over them

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use sw_core::{parse_sql_type, Column, Multiplicity, Nullability, Schema};
use sw_plan::{difference, intersect, union, SortKey, TableExpr};

/// A plan file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlanFile {
    /// Source relations, keyed by the name steps refer to them by
    pub tables: BTreeMap<String, TableDef>,

    /// The query to compile
    pub query: QueryDef,
}

/// One source relation
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TableDef {
    /// Physical table or view name
    #[serde(default)]
    pub table: Option<String>,

    /// SQL query used as a derived table
    #[serde(default)]
    pub sql: Option<String>,

    /// Declared output columns
    pub columns: Vec<ColumnDef>,

    /// Ordering applied to this relation before it enters the query
    #[serde(default)]
    pub order_by: Vec<String>,
}

/// A declared column
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ColumnDef {
    pub name: String,

    #[serde(rename = "type")]
    pub data_type: String,

    #[serde(default)]
    pub nullable: Option<bool>,
}

/// The set-operation query
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct QueryDef {
    /// Leftmost relation
    pub from: String,

    /// Operations applied left to right
    #[serde(default)]
    pub steps: Vec<StepDef>,

    /// Ordering of the final result
    #[serde(default)]
    pub order_by: Vec<String>,

    #[serde(default)]
    pub limit: Option<u64>,

    #[serde(default)]
    pub offset: u64,
}

/// One n-ary step
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StepDef {
    pub op: StepOp,

    /// Right-hand relations, combined with the running result in order
    pub inputs: Vec<String>,

    /// Set (true) or bag (false) semantics
    #[serde(default = "default_distinct")]
    pub distinct: bool,
}

/// Step operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StepOp {
    Union,
    Intersect,
    Difference,
}

fn default_distinct() -> bool {
    true
}

impl PlanFile {
    /// Load a plan file from disk
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid plan file: {}", path.display()))
    }

    /// Parse a plan from YAML text
    pub(crate) fn from_yaml(content: &str) -> Result<Self> {
        let plan: PlanFile = serde_yaml::from_str(content)?;
        Ok(plan)
    }

    /// Build the table expression the query describes
    pub(crate) fn build(&self) -> Result<TableExpr> {
        let mut relations = BTreeMap::new();
        for (name, def) in &self.tables {
            let expr = def
                .build()
                .with_context(|| format!("Invalid table '{name}'"))?;
            relations.insert(name.as_str(), expr);
        }

        let mut current = lookup(&relations, &self.query.from)?.clone();
        for (i, step) in self.query.steps.iter().enumerate() {
            if step.inputs.is_empty() {
                bail!("Step {} ({:?}) has no inputs", i + 1, step.op);
            }
            let inputs = step
                .inputs
                .iter()
                .map(|name| lookup(&relations, name).cloned())
                .collect::<Result<Vec<_>>>()?;
            let multiplicity = Multiplicity::from_distinct(step.distinct);
            current = match step.op {
                StepOp::Union => union(&current, &inputs, multiplicity),
                StepOp::Intersect => intersect(&current, &inputs, multiplicity),
                StepOp::Difference => difference(&current, &inputs, multiplicity),
            }
            .with_context(|| format!("Step {} failed", i + 1))?;
        }

        let keys = parse_sort_keys(&self.query.order_by)?;
        let ordered = current
            .order_by(keys)
            .context("Invalid query order_by")?;
        Ok(ordered.limit_offset(self.query.limit, self.query.offset))
    }
}

fn lookup<'r>(relations: &'r BTreeMap<&str, TableExpr>, name: &str) -> Result<&'r TableExpr> {
    match relations.get(name) {
        Some(expr) => Ok(expr),
        None => {
            let known: Vec<&str> = relations.keys().copied().collect();
            bail!("Unknown table '{}' (defined: {})", name, known.join(", "))
        }
    }
}

impl TableDef {
    fn build(&self) -> Result<TableExpr> {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let nullability = match c.nullable {
                    Some(true) => Nullability::Nullable,
                    Some(false) => Nullability::NotNull,
                    None => Nullability::Unknown,
                };
                Column::new(&c.name, parse_sql_type(&c.data_type)).with_nullability(nullability)
            })
            .collect();
        let schema = Schema::new(columns)?;

        let expr = match (&self.table, &self.sql) {
            (Some(table), None) => TableExpr::table(table, schema),
            (None, Some(sql)) => TableExpr::query(sql, schema),
            (Some(_), Some(_)) => bail!("Set either 'table' or 'sql', not both"),
            (None, None) => bail!("One of 'table' or 'sql' is required"),
        };

        let keys = parse_sort_keys(&self.order_by)?;
        Ok(expr.order_by(keys)?)
    }
}

/// Parse `column` or `column asc|desc` entries
pub(crate) fn parse_sort_keys(entries: &[String]) -> Result<Vec<SortKey>> {
    entries
        .iter()
        .map(|entry| {
            let mut parts = entry.split_whitespace();
            let Some(column) = parts.next() else {
                bail!("Empty order_by entry");
            };
            let key = match parts.next().map(str::to_ascii_lowercase).as_deref() {
                None | Some("asc") => SortKey::asc(column),
                Some("desc") => SortKey::desc(column),
                Some(other) => bail!("Invalid sort direction '{other}' in '{entry}'"),
            };
            if parts.next().is_some() {
                bail!("Invalid order_by entry '{entry}'");
            }
            Ok(key)
        })
        .collect()
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
