use super::*;
use sw_core::SqlType;
use sw_plan::{TableNode, TableSource};

const PLAN: &str = r#"
tables:
  a:
    table: functional_alltypes
    columns:
      - { name: id, type: INTEGER }
      - { name: label, type: VARCHAR, nullable: true }
  b:
    sql: "SELECT label, id FROM staging"
    columns:
      - { name: label, type: VARCHAR }
      - { name: id, type: BIGINT, nullable: false }
  c:
    table: archive
    columns:
      - { name: id, type: INTEGER }
      - { name: label, type: VARCHAR }
query:
  from: a
  steps:
    - op: union
      inputs: [b]
    - op: difference
      inputs: [c]
      distinct: false
  order_by: ["id desc", label]
  limit: 10
"#;

#[test]
fn test_build_plan() {
    let plan = PlanFile::from_yaml(PLAN).unwrap();
    assert_eq!(plan.tables.len(), 3);
    assert!(plan.query.steps[0].distinct);
    assert!(!plan.query.steps[1].distinct);

    let expr = plan.build().unwrap();
    assert_eq!(expr.schema().column_names(), vec!["id", "label"]);
    assert_eq!(
        expr.schema().columns()[0].sql_type,
        SqlType::Integer {
            bits: sw_core::IntBitWidth::I64
        }
    );

    let TableNode::Limit { input, limit, offset } = expr.node() else {
        panic!("expected a limit, got {:?}", expr.node());
    };
    assert_eq!(*limit, Some(10));
    assert_eq!(*offset, None);
    let TableNode::Sort { keys, input } = input.node() else {
        panic!("expected a sort");
    };
    assert_eq!(keys, &vec![SortKey::desc("id"), SortKey::asc("label")]);
    let TableNode::SetOp(chain) = input.node() else {
        panic!("expected a set operation");
    };
    assert_eq!(chain.steps().len(), 1);
    assert_eq!(chain.steps()[0].multiplicity, Multiplicity::All);
}

#[test]
fn test_sql_source_and_operand_order() {
    let plan = PlanFile::from_yaml(
        r#"
tables:
  q:
    sql: "SELECT 1 AS x"
    columns: [{ name: x, type: INTEGER }]
    order_by: [x]
query:
  from: q
"#,
    )
    .unwrap();
    let expr = plan.build().unwrap();
    let TableNode::Sort { input, .. } = expr.node() else {
        panic!("expected a sort");
    };
    assert!(matches!(
        input.node(),
        TableNode::Source { source: TableSource::Query(sql), .. } if sql == "SELECT 1 AS x"
    ));
}

#[test]
fn test_unknown_table_lists_defined_names() {
    let plan = PlanFile::from_yaml(
        r#"
tables:
  a:
    table: a
    columns: [{ name: x, type: INTEGER }]
query:
  from: a
  steps:
    - op: intersect
      inputs: [zz]
"#,
    )
    .unwrap();
    let err = plan.build().unwrap_err();
    assert_eq!(err.to_string(), "Unknown table 'zz' (defined: a)");
}

#[test]
fn test_step_without_inputs_rejected() {
    let plan = PlanFile::from_yaml(
        r#"
tables:
  a:
    table: a
    columns: [{ name: x, type: INTEGER }]
query:
  from: a
  steps:
    - op: union
      inputs: []
"#,
    )
    .unwrap();
    assert!(plan.build().unwrap_err().to_string().contains("no inputs"));
}

#[test]
fn test_table_and_sql_are_exclusive() {
    let plan = PlanFile::from_yaml(
        r#"
tables:
  a:
    table: a
    sql: "SELECT 1 AS x"
    columns: [{ name: x, type: INTEGER }]
query:
  from: a
"#,
    )
    .unwrap();
    let err = plan.build().unwrap_err();
    assert!(format!("{err:#}").contains("not both"));
}

#[test]
fn test_schema_mismatch_surfaces_at_build() {
    let plan = PlanFile::from_yaml(
        r#"
tables:
  a:
    table: a
    columns: [{ name: x, type: INTEGER }]
  b:
    table: b
    columns: [{ name: y, type: INTEGER }]
query:
  from: a
  steps:
    - op: union
      inputs: [b]
"#,
    )
    .unwrap();
    let err = plan.build().unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("Step 1 failed"));
    assert!(chain.contains("P001"));
}

#[test]
fn test_unknown_fields_rejected() {
    let err = PlanFile::from_yaml(
        r#"
tables: {}
query:
  from: a
  having: x
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("having"));
}

#[test]
fn test_parse_sort_keys() {
    let keys = parse_sort_keys(&["a".into(), "b DESC".into(), "c asc".into()]).unwrap();
    assert_eq!(
        keys,
        vec![SortKey::asc("a"), SortKey::desc("b"), SortKey::asc("c")]
    );
    assert!(parse_sort_keys(&["a sideways".into()]).is_err());
    assert!(parse_sort_keys(&["a desc extra".into()]).is_err());
}
