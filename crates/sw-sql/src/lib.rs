//! sw-sql - SQL dialect layer for Setwise
//!
//! This crate renders the dialect-sensitive pieces of generated SQL
//! (identifier quoting, set-operator tokens, cast type names, wrapping
//! selects with ORDER BY / LIMIT) and validates generated SQL with
//! sqlparser-rs.

pub mod dialect;
pub mod error;

pub use dialect::{
    dialect_for, BigQueryDialect, DuckDbDialect, GenericDialect, HiveDialect, MsSqlDialect,
    MySqlDialect, OracleDialect, PostgresDialect, SelectWrap, SnowflakeDialect, SqlDialect,
    SqliteDialect,
};
pub use error::{SqlError, SqlResult};
