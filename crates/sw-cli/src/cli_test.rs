use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    Cli::command().debug_assert();
}

#[test]
fn test_compile_accepts_comma_separated_backends() {
    let cli = Cli::try_parse_from(["sw", "compile", "plan.yml", "--backend", "duckdb,mssql"])
        .unwrap();
    match cli.command {
        Commands::Compile(args) => {
            assert_eq!(args.plan, "plan.yml");
            assert_eq!(args.backend, vec!["duckdb", "mssql"]);
            assert_eq!(args.output, CompileOutput::Sql);
            assert!(!args.strict_order);
        }
        other => panic!("expected compile, got {other:?}"),
    }
}

#[test]
fn test_compile_requires_backend() {
    assert!(Cli::try_parse_from(["sw", "compile", "plan.yml"]).is_err());
}

#[test]
fn test_capabilities_flag_is_global() {
    let cli = Cli::try_parse_from([
        "sw",
        "capabilities",
        "--capabilities",
        "caps.yml",
        "-o",
        "json",
    ])
    .unwrap();
    assert_eq!(cli.global.capabilities.as_deref(), Some("caps.yml"));
    match cli.command {
        Commands::Capabilities(args) => {
            assert_eq!(args.output, TableOutput::Json);
            assert!(args.backend.is_none());
        }
        other => panic!("expected capabilities, got {other:?}"),
    }
}
