//! Lowered SQL for every built-in backend parses in its own dialect

use sw_core::{IntBitWidth, Multiplicity, Schema, SqlType};
use sw_plan::{
    compile, lower, CapabilityRegistry, LowerOptions, PlanError, SortKey, Support, TableExpr,
};
use sw_sql::dialect_for;

fn table(name: &str) -> TableExpr {
    TableExpr::table(
        name,
        Schema::from_pairs([
            (
                "id",
                SqlType::Integer {
                    bits: IntBitWidth::I64,
                },
            ),
            ("label", SqlType::String { max_length: None }),
        ])
        .unwrap(),
    )
}

/// Expressions covering every (kind, multiplicity) pair plus wrapping
fn expressions() -> Vec<(&'static str, TableExpr)> {
    let (a, b, c) = (table("a"), table("b"), table("c"));
    let mut exprs = Vec::new();
    for m in Multiplicity::ALL {
        exprs.push(("union", a.union(&b, m).unwrap()));
        exprs.push(("intersect", a.intersect(&b, m).unwrap()));
        exprs.push(("difference", a.difference(&b, m).unwrap()));
    }
    exprs.push((
        "union then intersect",
        a.union(&b, Multiplicity::All)
            .unwrap()
            .intersect(&c, Multiplicity::Distinct)
            .unwrap(),
    ));
    exprs.push((
        "ordered limit",
        a.union(&b, Multiplicity::Distinct)
            .unwrap()
            .order_by(vec![SortKey::asc("id"), SortKey::desc("label")])
            .unwrap()
            .limit(10),
    ));
    exprs.push((
        "ordered operand",
        a.order_by(vec![SortKey::asc("id")])
            .unwrap()
            .union(&b, Multiplicity::All)
            .unwrap(),
    ));
    exprs
}

#[test]
fn test_lowered_sql_parses_for_every_backend() {
    let registry = CapabilityRegistry::builtin();
    let mut compiled = 0;
    for caps in registry.backends() {
        let dialect = dialect_for(caps.dialect);
        for (label, expr) in expressions() {
            match lower(&expr, caps, &LowerOptions::default()) {
                Ok(frag) => {
                    compiled += 1;
                    if let Err(e) = dialect.parse(frag.sql()) {
                        panic!(
                            "{} / {}: generated SQL does not parse: {}\n{}",
                            caps.name,
                            label,
                            e,
                            frag.sql()
                        );
                    }
                }
                Err(PlanError::UnsupportedOperation { .. }) => {}
                Err(e) => panic!("{} / {}: unexpected error: {}", caps.name, label, e),
            }
        }
    }
    assert!(compiled > 0);
}

#[test]
fn test_unsupported_entries_fail_and_never_fall_back() {
    let registry = CapabilityRegistry::builtin();
    let (a, b) = (table("a"), table("b"));
    for caps in registry.backends() {
        for (kind, m, support) in caps.entries() {
            let expr = match kind {
                sw_core::SetOpKind::Union => a.union(&b, m),
                sw_core::SetOpKind::Intersect => a.intersect(&b, m),
                sw_core::SetOpKind::Except => a.difference(&b, m),
            }
            .unwrap();
            let result = compile(&expr, caps.name.as_str(), registry, &LowerOptions::default());
            if support == Support::Unsupported {
                match result {
                    Err(PlanError::UnsupportedOperation {
                        backend,
                        kind: k,
                        multiplicity,
                    }) => {
                        assert_eq!(backend, caps.name);
                        assert_eq!(k, kind);
                        assert_eq!(multiplicity, m);
                    }
                    other => panic!("{}: expected UnsupportedOperation, got {other:?}", caps.name),
                }
            } else {
                let frag = result.unwrap();
                assert_eq!(frag.steps()[0].multiplicity, m);
            }
        }
    }
}

#[test]
fn test_operator_tokens_follow_dialect() {
    let registry = CapabilityRegistry::builtin();
    let (a, b) = (table("a"), table("b"));
    let expr = a.difference(&b, Multiplicity::All).unwrap();

    let pg = compile(&expr, "postgres", registry, &LowerOptions::default()).unwrap();
    assert_eq!(pg.steps()[0].operator, "EXCEPT ALL");
    assert!(pg.sql().contains("EXCEPT ALL"));

    let bq = compile(&expr, "bigquery", registry, &LowerOptions::default()).unwrap();
    assert_eq!(bq.steps()[0].operator, "EXCEPT DISTINCT");
    assert!(bq.sql().contains("ROW_NUMBER()"));
    assert!(!bq.sql().contains("EXCEPT ALL"));
}

#[test]
fn test_oracle_aliases_limits_and_minus() {
    let registry = CapabilityRegistry::builtin();
    let (a, b) = (table("a"), table("b"));

    let minus = compile(
        &a.difference(&b, Multiplicity::Distinct).unwrap(),
        "oracle",
        registry,
        &LowerOptions::default(),
    )
    .unwrap();
    assert_eq!(
        minus.sql(),
        r#"SELECT "id", "label" FROM "a" "_sw_0" MINUS SELECT "id", "label" FROM "b" "_sw_1""#
    );
    assert_eq!(minus.steps()[0].operator, "MINUS");

    let limited = a
        .union(&b, Multiplicity::Distinct)
        .unwrap()
        .order_by(vec![SortKey::asc("id")])
        .unwrap()
        .limit(10);
    let frag = compile(&limited, "oracle", registry, &LowerOptions::default()).unwrap();
    assert!(!frag.sql().contains(" AS \"_sw_"), "{}", frag.sql());
    assert!(!frag.sql().contains("LIMIT"), "{}", frag.sql());
    assert!(frag.sql().ends_with(r#"ORDER BY "id" ASC FETCH FIRST 10 ROWS ONLY"#));
    dialect_for(sw_core::DialectKind::Oracle)
        .parse(frag.sql())
        .unwrap();
}
