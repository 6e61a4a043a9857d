//! Rewrites for operators a backend lacks

use super::Lowerer;
use sw_core::{Multiplicity, Schema, SetOpKind};
use sw_sql::SelectWrap;

/// Bag INTERSECT/EXCEPT through the DISTINCT operator.
///
/// The n-th copy of a row on each side gets row number n, so `(row, n)`
/// pairs are unique and the DISTINCT operator keeps min(l, r) copies for
/// INTERSECT and max(l - r, 0) for EXCEPT. Returns the SQL and the operator
/// token used.
pub(super) fn row_number(
    lowerer: &mut Lowerer<'_>,
    kind: SetOpKind,
    left: &str,
    right: &str,
    schema: &Schema,
) -> (String, String) {
    let dialect = lowerer.dialect();
    let cols = lowerer.column_list(schema);
    let rn = dialect.quote_ident(&lowerer.helper_column("_sw_rn"));
    let projection =
        format!("{cols}, ROW_NUMBER() OVER (PARTITION BY {cols} ORDER BY {cols}) AS {rn}");

    let mut numbered = |sql: &str| {
        let from = lowerer.derived(sql);
        dialect.render_select(&SelectWrap {
            projection: &projection,
            from: &from,
            ..Default::default()
        })
    };
    let numbered_left = numbered(left);
    let numbered_right = numbered(right);

    let operator = dialect.set_operator(kind, Multiplicity::Distinct);
    let compound = format!("{numbered_left} {operator} {numbered_right}");
    (lowerer.wrap_columns(&compound, schema), operator)
}

/// UNION DISTINCT as `SELECT DISTINCT` over UNION ALL
pub(super) fn distinct_over_union_all(
    lowerer: &mut Lowerer<'_>,
    left: &str,
    right: &str,
    schema: &Schema,
) -> (String, String) {
    let dialect = lowerer.dialect();
    let operator = dialect.set_operator(SetOpKind::Union, Multiplicity::All);
    let from = lowerer.derived(&format!("{left} {operator} {right}"));
    let sql = dialect.render_select(&SelectWrap {
        projection: &lowerer.column_list(schema),
        from: &from,
        distinct: true,
        ..Default::default()
    });
    (sql, operator)
}
