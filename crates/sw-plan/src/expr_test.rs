use super::*;
use crate::error::MismatchReason;
use crate::test_utils::*;

#[test]
fn test_table_exposes_schema() {
    let t = table("t", &[("id", int32()), ("name", varchar())]);
    assert_eq!(t.schema().column_names(), vec!["id", "name"]);
    assert!(matches!(
        t.node(),
        TableNode::Source {
            source: TableSource::Table(ref name),
            ..
        } if name == "t"
    ));
}

#[test]
fn test_clone_shares_node() {
    let t = table("t", &[("id", int32())]);
    let c = t.clone();
    assert!(t.ptr_eq(&c));
    let other = table("t", &[("id", int32())]);
    assert!(!t.ptr_eq(&other));
    assert_eq!(t, other);
}

#[test]
fn test_set_op_references_operands() {
    let a = table("a", &[("id", int32())]);
    let b = table("b", &[("id", int32())]);
    let u = a.union(&b, Multiplicity::All).unwrap();
    match u.node() {
        TableNode::SetOp(chain) => {
            assert!(chain.base().ptr_eq(&a));
            assert!(chain.steps()[0].operand.ptr_eq(&b));
            assert_eq!(chain.steps()[0].kind, SetOpKind::Union);
            assert_eq!(chain.steps()[0].multiplicity, Multiplicity::All);
        }
        other => panic!("expected a set operation, got {other:?}"),
    }
}

#[test]
fn test_variadic_with_no_operands_is_identity() {
    let t = table("t", &[("id", int32())]);
    assert!(union(&t, &[], Multiplicity::Distinct).unwrap().ptr_eq(&t));
    assert!(intersect(&t, &[], Multiplicity::All).unwrap().ptr_eq(&t));
    assert!(difference(&t, &[], Multiplicity::Distinct).unwrap().ptr_eq(&t));
}

#[test]
fn test_set_op_schema_uses_leftmost_order() {
    let a = table("a", &[("id", int32()), ("name", varchar())]);
    let b = table("b", &[("name", varchar()), ("id", int64())]);
    let u = a.union(&b, Multiplicity::Distinct).unwrap();
    assert_eq!(u.schema().column_names(), vec!["id", "name"]);
    assert_eq!(u.schema().columns()[0].sql_type, int64());
}

#[test]
fn test_set_op_rejects_unreconcilable_operand() {
    let a = table("a", &[("id", int32())]);
    let b = table("b", &[("id", int32())]);
    let c = table("c", &[("key", int32())]);
    let err = union(&a, &[b, c], Multiplicity::All).unwrap_err();
    match err {
        PlanError::SchemaMismatch {
            operand, reason, ..
        } => {
            assert_eq!(operand, 2);
            assert_eq!(reason, MismatchReason::MissingColumns(vec!["id".into()]));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_order_by_validates_columns() {
    let t = table("t", &[("id", int32())]);
    let sorted = t.order_by(vec![SortKey::desc("id")]).unwrap();
    assert!(sorted.is_ordered());
    assert_eq!(sorted.schema(), t.schema());

    let err = t.order_by(vec![SortKey::asc("missing")]).unwrap_err();
    assert!(matches!(err, PlanError::UnknownColumn { ref column, .. } if column == "missing"));
    assert!(err.to_string().contains("available: id"));
}

#[test]
fn test_empty_order_by_is_identity() {
    let t = table("t", &[("id", int32())]);
    assert!(t.order_by(vec![]).unwrap().ptr_eq(&t));
}

#[test]
fn test_limit_offset() {
    let t = table("t", &[("id", int32())]);
    match t.limit_offset(Some(10), 5).node() {
        TableNode::Limit { limit, offset, .. } => {
            assert_eq!(*limit, Some(10));
            assert_eq!(*offset, Some(5));
        }
        other => panic!("expected a limit, got {other:?}"),
    }
    match t.limit(3).node() {
        TableNode::Limit { offset, .. } => assert_eq!(*offset, None),
        other => panic!("expected a limit, got {other:?}"),
    }
    assert!(t.limit_offset(None, 0).ptr_eq(&t));
    assert!(!t.limit(1).is_ordered());
}

#[test]
fn test_expressions_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TableExpr>();
}

#[test]
fn test_set_op_over_columnless_tables_rejected() {
    let a = TableExpr::table("a", Schema::new(Vec::new()).unwrap());
    let b = TableExpr::table("b", Schema::new(Vec::new()).unwrap());
    let err = a.union(&b, Multiplicity::All).unwrap_err();
    assert!(matches!(
        err,
        PlanError::SchemaMismatch {
            reason: MismatchReason::NoColumns,
            ..
        }
    ));
}
