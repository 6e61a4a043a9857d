//! Schema reconciliation: align operand columns by name, not position

use crate::error::{MismatchReason, PlanError, PlanResult};
use std::collections::HashMap;
use sw_core::{Column, Nullability, Schema, SqlType};

/// Canonical schema plus how each operand maps onto it.
///
/// Operand 0 is the leftmost operand; its column order is the canonical
/// order. Types are widened across all operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    canonical: Schema,
    /// Per operand: input position -> canonical position
    permutations: Vec<Vec<usize>>,
    /// Per operand: canonical position -> input position
    projections: Vec<Vec<usize>>,
    /// Per operand: declared type at each canonical position
    operand_types: Vec<Vec<SqlType>>,
}

impl Reconciliation {
    /// Canonical output schema
    pub fn canonical(&self) -> &Schema {
        &self.canonical
    }

    /// Consume into the canonical schema
    pub fn into_canonical(self) -> Schema {
        self.canonical
    }

    /// Number of reconciled operands
    pub fn operand_count(&self) -> usize {
        self.permutations.len()
    }

    /// For operand `i`: input position -> canonical position
    pub fn permutation(&self, i: usize) -> &[usize] {
        &self.permutations[i]
    }

    /// For operand `i`: canonical position -> input position
    pub fn projection(&self, i: usize) -> &[usize] {
        &self.projections[i]
    }

    /// Whether operand `i` declares a narrower type than the canonical one
    /// at canonical position `pos`
    pub fn needs_cast(&self, i: usize, pos: usize) -> bool {
        self.operand_types[i][pos] != self.canonical.columns()[pos].sql_type
    }

    /// Whether operand `i` already matches the canonical schema exactly
    pub fn is_identity(&self, i: usize) -> bool {
        self.permutations[i].iter().enumerate().all(|(a, b)| a == *b)
            && (0..self.canonical.len()).all(|pos| !self.needs_cast(i, pos))
    }
}

/// Reconcile operand schemas.
///
/// Columns are matched by name through a per-operand name -> index map.
/// Fails with `SchemaMismatch` when an operand has no columns, when the name
/// sets differ, or when a column's types have no lossless common type (see
/// [`SqlType::widen`]).
pub fn reconcile(schemas: &[&Schema]) -> PlanResult<Reconciliation> {
    let Some((first, rest)) = schemas.split_first() else {
        return Ok(Reconciliation {
            canonical: Schema::new(Vec::new())?,
            permutations: Vec::new(),
            projections: Vec::new(),
            operand_types: Vec::new(),
        });
    };

    if let Some(operand) = schemas.iter().position(|s| s.is_empty()) {
        return Err(PlanError::SchemaMismatch {
            operand,
            expected: (*first).clone(),
            found: schemas[operand].clone(),
            reason: MismatchReason::NoColumns,
        });
    }

    let width = first.len();
    let first_index = name_index(first);
    let mut types: Vec<SqlType> = first.columns().iter().map(|c| c.sql_type.clone()).collect();
    let mut nullability: Vec<Nullability> =
        first.columns().iter().map(|c| c.nullability).collect();

    let mut permutations = vec![(0..width).collect::<Vec<_>>()];
    let mut operand_types = vec![types.clone()];

    for (offset, schema) in rest.iter().enumerate() {
        let operand = offset + 1;
        let index = name_index(schema);
        let mismatch = |reason| PlanError::SchemaMismatch {
            operand,
            expected: (*first).clone(),
            found: (*schema).clone(),
            reason,
        };

        let missing: Vec<String> = first
            .columns()
            .iter()
            .filter(|c| !index.contains_key(c.name.as_str()))
            .map(|c| c.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(mismatch(MismatchReason::MissingColumns(missing)));
        }
        let extra: Vec<String> = schema
            .columns()
            .iter()
            .filter(|c| !first_index.contains_key(c.name.as_str()))
            .map(|c| c.name.clone())
            .collect();
        if !extra.is_empty() {
            return Err(mismatch(MismatchReason::ExtraColumns(extra)));
        }

        let mut permutation = vec![0; width];
        let mut declared = Vec::with_capacity(width);
        for (pos, col) in first.columns().iter().enumerate() {
            let input_pos = index[col.name.as_str()];
            let found = &schema.columns()[input_pos];
            types[pos] = types[pos].widen(&found.sql_type).ok_or_else(|| {
                mismatch(MismatchReason::IncompatibleType {
                    column: col.name.clone(),
                    expected: types[pos].clone(),
                    found: found.sql_type.clone(),
                })
            })?;
            nullability[pos] = nullability[pos].combine(found.nullability);
            permutation[input_pos] = pos;
            declared.push(found.sql_type.clone());
        }

        if permutation.iter().enumerate().any(|(a, b)| a != *b) {
            log::debug!(
                "Operand {} declares columns in a different order; reordering to ({})",
                operand,
                first.column_names().join(", ")
            );
        }
        permutations.push(permutation);
        operand_types.push(declared);
    }

    let canonical = Schema::new(
        first
            .columns()
            .iter()
            .zip(types)
            .zip(nullability)
            .map(|((col, sql_type), nullability)| Column {
                name: col.name.clone(),
                sql_type,
                nullability,
            })
            .collect(),
    )?;

    let projections = permutations
        .iter()
        .map(|perm| {
            let mut inverse = vec![0; perm.len()];
            for (input_pos, &pos) in perm.iter().enumerate() {
                inverse[pos] = input_pos;
            }
            inverse
        })
        .collect();

    Ok(Reconciliation {
        canonical,
        permutations,
        projections,
        operand_types,
    })
}

fn name_index(schema: &Schema) -> HashMap<&str, usize> {
    schema
        .columns()
        .iter()
        .enumerate()
        .map(|(pos, c)| (c.name.as_str(), pos))
        .collect()
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
