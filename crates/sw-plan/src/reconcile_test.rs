use super::*;
use sw_core::{IntBitWidth, Nullability};

fn int(bits: IntBitWidth) -> SqlType {
    SqlType::Integer { bits }
}

fn varchar(len: Option<u32>) -> SqlType {
    SqlType::String { max_length: len }
}

fn schema(cols: &[(&str, SqlType)]) -> Schema {
    Schema::from_pairs(cols.iter().cloned()).unwrap()
}

#[test]
fn test_identical_schemas_are_identity() {
    let a = schema(&[("id", int(IntBitWidth::I32)), ("name", varchar(None))]);
    let b = a.clone();
    let rec = reconcile(&[&a, &b]).unwrap();
    assert_eq!(rec.canonical(), &a);
    assert_eq!(rec.operand_count(), 2);
    assert!(rec.is_identity(0));
    assert!(rec.is_identity(1));
}

#[test]
fn test_permuted_columns_match_by_name() {
    let a = schema(&[
        ("id", int(IntBitWidth::I32)),
        ("name", varchar(None)),
        ("flag", SqlType::Boolean),
    ]);
    let b = schema(&[
        ("flag", SqlType::Boolean),
        ("id", int(IntBitWidth::I32)),
        ("name", varchar(None)),
    ]);
    let rec = reconcile(&[&a, &b]).unwrap();

    assert_eq!(rec.canonical().column_names(), vec!["id", "name", "flag"]);
    // b's flag (input 0) lands at canonical 2, id (input 1) at canonical 0
    assert_eq!(rec.permutation(1), &[2, 0, 1]);
    // canonical id reads b's input 1
    assert_eq!(rec.projection(1), &[1, 2, 0]);
    assert!(!rec.is_identity(1));
    assert!(!rec.needs_cast(1, 0));
}

#[test]
fn test_projection_inverts_permutation() {
    let a = schema(&[
        ("a", SqlType::Date),
        ("b", SqlType::Boolean),
        ("c", varchar(None)),
        ("d", int(IntBitWidth::I64)),
    ]);
    let b = schema(&[
        ("c", varchar(None)),
        ("a", SqlType::Date),
        ("d", int(IntBitWidth::I64)),
        ("b", SqlType::Boolean),
    ]);
    let rec = reconcile(&[&a, &b]).unwrap();
    let perm = rec.permutation(1);
    let proj = rec.projection(1);
    for (input_pos, &canonical_pos) in perm.iter().enumerate() {
        assert_eq!(proj[canonical_pos], input_pos);
        assert_eq!(
            b.columns()[input_pos].name,
            rec.canonical().columns()[canonical_pos].name
        );
    }
}

#[test]
fn test_missing_column_reported_by_name() {
    let a = schema(&[("id", int(IntBitWidth::I32)), ("name", varchar(None))]);
    let b = schema(&[("id", int(IntBitWidth::I32))]);
    let err = reconcile(&[&a, &b]).unwrap_err();
    match err {
        PlanError::SchemaMismatch {
            operand,
            reason: MismatchReason::MissingColumns(cols),
            ..
        } => {
            assert_eq!(operand, 1);
            assert_eq!(cols, vec!["name".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_extra_column_reported_by_name() {
    let a = schema(&[("id", int(IntBitWidth::I32))]);
    let b = schema(&[("id", int(IntBitWidth::I32)), ("extra", SqlType::Date)]);
    let err = reconcile(&[&a, &b]).unwrap_err();
    assert!(matches!(
        err,
        PlanError::SchemaMismatch {
            reason: MismatchReason::ExtraColumns(ref cols),
            ..
        } if cols == &vec!["extra".to_string()]
    ));
}

#[test]
fn test_same_count_different_names_is_mismatch() {
    let a = schema(&[("id", int(IntBitWidth::I32))]);
    let b = schema(&[("ID", int(IntBitWidth::I32))]);
    let err = reconcile(&[&a, &b]).unwrap_err();
    assert!(err.to_string().starts_with("[P001]"));
}

#[test]
fn test_integer_widening() {
    let a = schema(&[("x", int(IntBitWidth::I16))]);
    let b = schema(&[("x", int(IntBitWidth::I64))]);
    let rec = reconcile(&[&a, &b]).unwrap();
    assert_eq!(rec.canonical().columns()[0].sql_type, int(IntBitWidth::I64));
    assert!(rec.needs_cast(0, 0));
    assert!(!rec.needs_cast(1, 0));
}

#[test]
fn test_widening_spans_all_operands() {
    let a = schema(&[("s", varchar(Some(10)))]);
    let b = schema(&[("s", varchar(Some(40)))]);
    let c = schema(&[("s", varchar(Some(20)))]);
    let rec = reconcile(&[&a, &b, &c]).unwrap();
    assert_eq!(rec.canonical().columns()[0].sql_type, varchar(Some(40)));
    assert!(rec.needs_cast(0, 0));
    assert!(!rec.needs_cast(1, 0));
    assert!(rec.needs_cast(2, 0));
}

#[test]
fn test_integer_float_mix_is_rejected() {
    let a = schema(&[("v", int(IntBitWidth::I32))]);
    let b = schema(&[(
        "v",
        SqlType::Float {
            bits: sw_core::FloatBitWidth::F64,
        },
    )]);
    let err = reconcile(&[&a, &b]).unwrap_err();
    match err {
        PlanError::SchemaMismatch {
            reason: MismatchReason::IncompatibleType { column, .. },
            ..
        } => assert_eq!(column, "v"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_mismatch_names_failing_operand() {
    let a = schema(&[("d", SqlType::Date)]);
    let b = schema(&[("d", SqlType::Date)]);
    let c = schema(&[("d", SqlType::Timestamp)]);
    let err = reconcile(&[&a, &b, &c]).unwrap_err();
    assert!(matches!(err, PlanError::SchemaMismatch { operand: 2, .. }));
}

#[test]
fn test_nullability_combines() {
    let a = Schema::new(vec![
        Column::new("id", int(IntBitWidth::I32)).with_nullability(Nullability::NotNull)
    ])
    .unwrap();
    let b = Schema::new(vec![
        Column::new("id", int(IntBitWidth::I32)).with_nullability(Nullability::Nullable)
    ])
    .unwrap();
    let rec = reconcile(&[&a, &b]).unwrap();
    assert_eq!(
        rec.canonical().columns()[0].nullability,
        Nullability::Nullable
    );
}

#[test]
fn test_single_schema_is_its_own_canonical() {
    let a = schema(&[("b", SqlType::Boolean), ("a", SqlType::Date)]);
    let rec = reconcile(&[&a]).unwrap();
    assert_eq!(rec.canonical(), &a);
    assert!(rec.is_identity(0));
}

#[test]
fn test_no_schemas_reconcile_to_empty() {
    let rec = reconcile(&[]).unwrap();
    assert!(rec.canonical().is_empty());
    assert_eq!(rec.operand_count(), 0);
}

#[test]
fn test_operand_without_columns_rejected() {
    let a = schema(&[("id", int(IntBitWidth::I32))]);
    let empty = Schema::new(Vec::new()).unwrap();
    let err = reconcile(&[&a, &empty]).unwrap_err();
    match err {
        PlanError::SchemaMismatch {
            operand, reason, ..
        } => {
            assert_eq!(operand, 1);
            assert_eq!(reason, MismatchReason::NoColumns);
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = reconcile(&[&empty, &empty]).unwrap_err();
    assert!(matches!(err, PlanError::SchemaMismatch { operand: 0, .. }));
    assert!(err.to_string().contains("operand has no columns"));
}
