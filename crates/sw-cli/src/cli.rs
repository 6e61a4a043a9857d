//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Setwise - compile UNION / INTERSECT / EXCEPT plans to backend SQL
#[derive(Parser, Debug)]
#[command(name = "sw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory searched for setwise.yml when --capabilities is not given
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Capability override file
    #[arg(short = 'c', long, global = true, env = "SETWISE_CAPABILITIES")]
    pub capabilities: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a plan file to SQL for one or more backends
    Compile(CompileArgs),

    /// Show the effective capability table
    Capabilities(CapabilitiesArgs),

    /// List known backends and their dialects
    Backends(BackendsArgs),
}

/// Arguments for the compile command
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Path to the YAML plan file
    pub plan: String,

    /// Target backend ids (comma-separated)
    #[arg(short, long, required = true, value_delimiter = ',')]
    pub backend: Vec<String>,

    /// Fail instead of dropping operand ORDER BY the backend cannot express
    #[arg(long)]
    pub strict_order: bool,

    /// Parse the generated SQL in the backend's dialect before printing
    #[arg(long)]
    pub check: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "sql")]
    pub output: CompileOutput,
}

/// Compile output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileOutput {
    /// Generated SQL only
    Sql,
    /// Full lowered fragment as JSON
    Json,
}

/// Arguments for the capabilities command
#[derive(Args, Debug)]
pub struct CapabilitiesArgs {
    /// Show a single backend
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: TableOutput,
}

/// Arguments for the backends command
#[derive(Args, Debug)]
pub struct BackendsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: TableOutput,
}

/// Listing output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
