use super::*;
use std::io::Write;

fn global(project_dir: &str, capabilities: Option<&str>) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: project_dir.to_string(),
        capabilities: capabilities.map(str::to_string),
    }
}

#[test]
fn test_format_table_aligns_columns() {
    let table = format_table(
        &["BACKEND", "DIALECT"],
        &[
            vec!["duckdb".into(), "duckdb".into()],
            vec!["sqlite".into(), "sqlite".into()],
            vec!["x".into(), "generic".into()],
        ],
    );
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines[0], "BACKEND  DIALECT");
    assert_eq!(lines[1], "-------  -------");
    assert_eq!(lines[2], "duckdb   duckdb");
    assert_eq!(lines[4], "x        generic");
}

#[test]
fn test_no_capability_file_uses_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let g = global(dir.path().to_str().unwrap(), None);
    assert!(load_config(&g).unwrap().is_none());

    let (registry, policy) = load_registry(&g).unwrap();
    assert_eq!(policy, OrderPolicy::Drop);
    assert_eq!(
        registry.backends().count(),
        CapabilityRegistry::builtin().backends().count()
    );
}

#[test]
fn test_project_dir_capability_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("setwise.yml"),
        "order_policy: strict\nbackends:\n  warehouse:\n    dialect: postgres\n    intersect_all: unsupported\n",
    )
    .unwrap();
    let g = global(dir.path().to_str().unwrap(), None);
    let (registry, policy) = load_registry(&g).unwrap();
    assert_eq!(policy, OrderPolicy::Strict);
    assert!(registry.get("warehouse").is_ok());
}

#[test]
fn test_explicit_capability_file_wins() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("setwise.yml"), "order_policy: strict\n").unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "order_policy: drop").unwrap();
    let g = global(
        dir.path().to_str().unwrap(),
        Some(file.path().to_str().unwrap()),
    );
    let (_, policy) = load_registry(&g).unwrap();
    assert_eq!(policy, OrderPolicy::Drop);
}

#[test]
fn test_missing_capability_file_is_an_error() {
    let g = global(".", Some("/nonexistent/setwise.yml"));
    let err = load_config(&g).unwrap_err();
    assert!(err.to_string().contains("Failed to load capability file"));
}

#[test]
fn test_new_backend_without_dialect_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "backends:\n  mystery:\n    union_all: supported").unwrap();
    let g = global(".", Some(file.path().to_str().unwrap()));
    let err = load_registry(&g).unwrap_err();
    assert!(format!("{err:#}").contains("must set 'dialect'"));
}
