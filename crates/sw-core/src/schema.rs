//! Relation schema: ordered list of uniquely named, typed columns

use crate::error::{CoreError, CoreResult};
use crate::types::{Nullability, SqlType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name (compared exactly, case-sensitive)
    pub name: String,
    /// Declared SQL type
    pub sql_type: SqlType,
    /// Declared nullability
    #[serde(default)]
    pub nullability: Nullability,
}

impl Column {
    /// Create a column with unknown nullability
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            nullability: Nullability::Unknown,
        }
    }

    /// Return the column with the given nullability
    pub fn with_nullability(mut self, nullability: Nullability) -> Self {
        self.nullability = nullability;
        self
    }
}

/// Ordered column list of a relation.
///
/// Column names are unique within a schema; the only way to build one is
/// through [`Schema::new`], which enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Create a schema, rejecting empty or duplicate column names
    pub fn new(columns: Vec<Column>) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for (position, col) in columns.iter().enumerate() {
            if col.name.is_empty() {
                return Err(CoreError::EmptyColumnName { position });
            }
            if !seen.insert(col.name.as_str()) {
                return Err(CoreError::DuplicateColumn {
                    column: col.name.clone(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Create a schema from `(name, type)` pairs
    pub fn from_pairs<S: Into<String>>(
        pairs: impl IntoIterator<Item = (S, SqlType)>,
    ) -> CoreResult<Self> {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, ty)| Column::new(name, ty))
                .collect(),
        )
    }

    /// Ordered columns
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Find a column by exact name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Position of a column by exact name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

impl TryFrom<Vec<Column>> for Schema {
    type Error = CoreError;

    fn try_from(columns: Vec<Column>) -> CoreResult<Self> {
        Schema::new(columns)
    }
}

impl From<Schema> for Vec<Column> {
    fn from(schema: Schema) -> Self {
        schema.columns
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", col.name, col.sql_type)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
