//! SQL dialect abstraction

use sqlparser::ast::Statement;
use sqlparser::dialect::{
    BigQueryDialect as SqlParserBigQuery, Dialect, DuckDbDialect as SqlParserDuckDb,
    GenericDialect as SqlParserGeneric, HiveDialect as SqlParserHive,
    MsSqlDialect as SqlParserMsSql, MySqlDialect as SqlParserMySql,
    OracleDialect as SqlParserOracle, PostgreSqlDialect as SqlParserPostgres, SQLiteDialect as SqlParserSqlite,
    SnowflakeDialect as SqlParserSnowflake,
};
use sqlparser::parser::Parser;
use sw_core::{DialectKind, FloatBitWidth, IntBitWidth, Multiplicity, SetOpKind, SqlType};

use crate::error::{SqlError, SqlResult};

/// A `SELECT` that wraps an already rendered relation.
///
/// Used for operand projections and for ORDER BY / LIMIT applied on top of a
/// set operation; the inner relation is never rewritten.
#[derive(Debug, Clone, Default)]
pub struct SelectWrap<'a> {
    /// Select list, already rendered
    pub projection: &'a str,
    /// FROM clause body, already rendered (table or `(subquery) AS alias`)
    pub from: &'a str,
    /// Emit `SELECT DISTINCT`
    pub distinct: bool,
    /// ORDER BY body, already rendered
    pub order_by: Option<&'a str>,
    /// Maximum rows to return
    pub limit: Option<u64>,
    /// Rows to skip
    pub offset: Option<u64>,
}

/// Trait for SQL dialect implementations
pub trait SqlDialect: Send + Sync {
    /// Get the underlying sqlparser dialect
    fn parser_dialect(&self) -> &dyn Dialect;

    /// Dialect family
    fn kind(&self) -> DialectKind;

    /// Parse SQL into AST statements
    fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let stmts = Parser::parse_sql(self.parser_dialect(), sql).map_err(|e| {
            let msg = e.to_string();
            let (line, column) = parse_location_from_error(&msg);
            SqlError::ParseError {
                message: msg,
                line,
                column,
            }
        })?;
        if stmts.is_empty() {
            return Err(SqlError::EmptySql);
        }
        Ok(stmts)
    }

    /// Quote an identifier for this dialect
    fn quote_ident(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    /// Quote a possibly schema-qualified name (`schema.table`) part by part
    fn quote_qualified(&self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote_ident(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Attach an alias to a table name or parenthesized subquery
    fn table_alias(&self, relation: &str, alias: &str) -> String {
        format!("{relation} AS {alias}")
    }

    /// Operator token for a set operation
    fn set_operator(&self, kind: SetOpKind, multiplicity: Multiplicity) -> String {
        match multiplicity {
            Multiplicity::Distinct => kind.keyword().to_string(),
            Multiplicity::All => format!("{} ALL", kind.keyword()),
        }
    }

    /// Type name used as a CAST target
    fn cast_type(&self, ty: &SqlType) -> String {
        ty.display_name()
    }

    /// Render a wrapping select
    fn render_select(&self, select: &SelectWrap<'_>) -> String {
        let mut sql = String::from("SELECT ");
        if select.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(select.projection);
        sql.push_str(" FROM ");
        sql.push_str(select.from);
        if let Some(order_by) = select.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        match (select.limit, select.offset) {
            (Some(limit), offset) => {
                sql.push_str(&format!(" LIMIT {limit}"));
                if let Some(offset) = offset {
                    sql.push_str(&format!(" OFFSET {offset}"));
                }
            }
            (None, Some(offset)) => sql.push_str(&self.offset_only(offset)),
            (None, None) => {}
        }
        sql
    }

    /// OFFSET clause without a LIMIT
    fn offset_only(&self, offset: u64) -> String {
        format!(" OFFSET {offset}")
    }

    /// Get the dialect name
    fn name(&self) -> &'static str;
}

/// Parse line and column from sqlparser error message.
///
/// sqlparser's `ParserError` is a string wrapper with no structured location
/// data, so "Line: N, Column: M" is extracted from the message text.
fn parse_location_from_error(msg: &str) -> (usize, usize) {
    let Some(line_idx) = msg.find("Line: ") else {
        return (0, 0);
    };
    let line_start = line_idx + 6;
    let Some(comma_idx) = msg[line_start..].find(',') else {
        return (0, 0);
    };
    let Ok(line) = msg[line_start..line_start + comma_idx]
        .trim()
        .parse::<usize>()
    else {
        return (0, 0);
    };
    let Some(col_idx) = msg.find("Column: ") else {
        return (0, 0);
    };
    let col_start = col_idx + 8;
    let col_end = msg[col_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| col_start + i)
        .unwrap_or(msg.len());
    let Ok(column) = msg[col_start..col_end].trim().parse::<usize>() else {
        return (0, 0);
    };
    (line, column)
}

fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Look up the shared dialect instance for a dialect family
pub fn dialect_for(kind: DialectKind) -> &'static dyn SqlDialect {
    static GENERIC: GenericDialect = GenericDialect {
        dialect: SqlParserGeneric {},
    };
    static DUCKDB: DuckDbDialect = DuckDbDialect {
        dialect: SqlParserDuckDb {},
    };
    static POSTGRES: PostgresDialect = PostgresDialect {
        dialect: SqlParserPostgres {},
    };
    static SQLITE: SqliteDialect = SqliteDialect {
        dialect: SqlParserSqlite {},
    };
    static MSSQL: MsSqlDialect = MsSqlDialect {
        dialect: SqlParserMsSql {},
    };
    static SNOWFLAKE: SnowflakeDialect = SnowflakeDialect {
        dialect: SqlParserSnowflake {},
    };
    static BIGQUERY: BigQueryDialect = BigQueryDialect {
        dialect: SqlParserBigQuery {},
    };
    static MYSQL: MySqlDialect = MySqlDialect {
        dialect: SqlParserMySql {},
    };
    static HIVE: HiveDialect = HiveDialect {
        dialect: SqlParserHive {},
    };
    static ORACLE: OracleDialect = OracleDialect {
        dialect: SqlParserOracle,
    };

    match kind {
        DialectKind::Generic => &GENERIC,
        DialectKind::DuckDb => &DUCKDB,
        DialectKind::Postgres => &POSTGRES,
        DialectKind::Sqlite => &SQLITE,
        DialectKind::MsSql => &MSSQL,
        DialectKind::Snowflake => &SNOWFLAKE,
        DialectKind::BigQuery => &BIGQUERY,
        DialectKind::MySql => &MYSQL,
        DialectKind::Hive => &HIVE,
        DialectKind::Oracle => &ORACLE,
    }
}

/// ANSI-style SQL
pub struct GenericDialect {
    dialect: SqlParserGeneric,
}

impl GenericDialect {
    /// Create a new generic dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserGeneric {},
        }
    }
}

impl Default for GenericDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for GenericDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Generic
    }

    fn name(&self) -> &'static str {
        "generic"
    }
}

/// DuckDB SQL dialect
pub struct DuckDbDialect {
    dialect: SqlParserDuckDb,
}

impl DuckDbDialect {
    /// Create a new DuckDB dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserDuckDb {},
        }
    }
}

impl Default for DuckDbDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for DuckDbDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn kind(&self) -> DialectKind {
        DialectKind::DuckDb
    }

    fn name(&self) -> &'static str {
        "duckdb"
    }
}

/// PostgreSQL SQL dialect
pub struct PostgresDialect {
    dialect: SqlParserPostgres,
}

impl PostgresDialect {
    /// Create a new PostgreSQL dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserPostgres {},
        }
    }
}

impl Default for PostgresDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for PostgresDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn cast_type(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::Integer {
                bits: IntBitWidth::I8,
            } => "SMALLINT".into(),
            SqlType::HugeInt => "NUMERIC(39,0)".into(),
            SqlType::Float {
                bits: FloatBitWidth::F32,
            } => "REAL".into(),
            SqlType::Float {
                bits: FloatBitWidth::F64,
            } => "DOUBLE PRECISION".into(),
            SqlType::Binary => "BYTEA".into(),
            SqlType::Array(inner) => format!("{}[]", self.cast_type(inner)),
            other => other.display_name(),
        }
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

/// SQLite SQL dialect
pub struct SqliteDialect {
    dialect: SqlParserSqlite,
}

impl SqliteDialect {
    /// Create a new SQLite dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserSqlite {},
        }
    }
}

impl Default for SqliteDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for SqliteDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    fn offset_only(&self, offset: u64) -> String {
        format!(" LIMIT -1 OFFSET {offset}")
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

/// Microsoft SQL Server dialect
pub struct MsSqlDialect {
    dialect: SqlParserMsSql,
}

impl MsSqlDialect {
    /// Create a new SQL Server dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserMsSql {},
        }
    }
}

impl Default for MsSqlDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for MsSqlDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn kind(&self) -> DialectKind {
        DialectKind::MsSql
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("[{}]", ident.replace(']', "]]"))
    }

    fn cast_type(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::Boolean => "BIT".into(),
            SqlType::HugeInt => "DECIMAL(38,0)".into(),
            SqlType::Float {
                bits: FloatBitWidth::F32,
            } => "REAL".into(),
            SqlType::Float {
                bits: FloatBitWidth::F64,
            } => "FLOAT".into(),
            SqlType::String { max_length: None } => "NVARCHAR(MAX)".into(),
            SqlType::String {
                max_length: Some(n),
            } => format!("NVARCHAR({n})"),
            SqlType::Timestamp => "DATETIME2".into(),
            SqlType::Binary => "VARBINARY(MAX)".into(),
            SqlType::Uuid => "UNIQUEIDENTIFIER".into(),
            other => other.display_name(),
        }
    }

    /// SQL Server has no LIMIT: `TOP (n)` without an offset, otherwise
    /// `OFFSET .. FETCH`, which requires an ORDER BY.
    fn render_select(&self, select: &SelectWrap<'_>) -> String {
        let mut sql = String::from("SELECT ");
        if select.distinct {
            sql.push_str("DISTINCT ");
        }
        if let (Some(limit), None) = (select.limit, select.offset) {
            sql.push_str(&format!("TOP ({limit}) "));
        }
        sql.push_str(select.projection);
        sql.push_str(" FROM ");
        sql.push_str(select.from);
        if let Some(offset) = select.offset {
            sql.push_str(" ORDER BY ");
            sql.push_str(select.order_by.unwrap_or("(SELECT NULL)"));
            sql.push_str(&format!(" OFFSET {offset} ROWS"));
            if let Some(limit) = select.limit {
                sql.push_str(&format!(" FETCH NEXT {limit} ROWS ONLY"));
            }
        } else if let Some(order_by) = select.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        sql
    }

    fn name(&self) -> &'static str {
        "mssql"
    }
}

/// Snowflake SQL dialect
pub struct SnowflakeDialect {
    dialect: SqlParserSnowflake,
}

impl SnowflakeDialect {
    /// Create a new Snowflake dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserSnowflake {},
        }
    }
}

impl Default for SnowflakeDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for SnowflakeDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Snowflake
    }

    fn cast_type(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::HugeInt => "NUMBER(38,0)".into(),
            SqlType::Json => "VARIANT".into(),
            SqlType::Array(_) => "ARRAY".into(),
            other => other.display_name(),
        }
    }

    fn name(&self) -> &'static str {
        "snowflake"
    }
}

/// Google BigQuery dialect
pub struct BigQueryDialect {
    dialect: SqlParserBigQuery,
}

impl BigQueryDialect {
    /// Create a new BigQuery dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserBigQuery {},
        }
    }
}

impl Default for BigQueryDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for BigQueryDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn kind(&self) -> DialectKind {
        DialectKind::BigQuery
    }

    fn quote_ident(&self, ident: &str) -> String {
        quote_backtick(ident)
    }

    /// BigQuery rejects a bare `UNION`; the quantifier is always spelled out.
    fn set_operator(&self, kind: SetOpKind, multiplicity: Multiplicity) -> String {
        format!("{} {}", kind.keyword(), multiplicity)
    }

    fn cast_type(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::Boolean => "BOOL".into(),
            SqlType::Integer { .. } => "INT64".into(),
            SqlType::HugeInt => "BIGNUMERIC".into(),
            SqlType::Float { .. } => "FLOAT64".into(),
            SqlType::Decimal { .. } => "NUMERIC".into(),
            SqlType::String { .. } => "STRING".into(),
            SqlType::Binary => "BYTES".into(),
            SqlType::Uuid => "STRING".into(),
            SqlType::Array(inner) => format!("ARRAY<{}>", self.cast_type(inner)),
            other => other.display_name(),
        }
    }

    fn offset_only(&self, offset: u64) -> String {
        format!(" LIMIT {} OFFSET {offset}", i64::MAX)
    }

    fn name(&self) -> &'static str {
        "bigquery"
    }
}

/// MySQL dialect
pub struct MySqlDialect {
    dialect: SqlParserMySql,
}

impl MySqlDialect {
    /// Create a new MySQL dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserMySql {},
        }
    }
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for MySqlDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn kind(&self) -> DialectKind {
        DialectKind::MySql
    }

    fn quote_ident(&self, ident: &str) -> String {
        quote_backtick(ident)
    }

    /// MySQL only accepts a handful of CAST targets.
    fn cast_type(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::Integer { .. } | SqlType::HugeInt => "SIGNED".into(),
            SqlType::Float {
                bits: FloatBitWidth::F32,
            } => "FLOAT".into(),
            SqlType::Float {
                bits: FloatBitWidth::F64,
            } => "DOUBLE".into(),
            SqlType::String {
                max_length: Some(n),
            } => format!("CHAR({n})"),
            SqlType::String { max_length: None } => "CHAR".into(),
            SqlType::Timestamp => "DATETIME".into(),
            SqlType::Binary => "BINARY".into(),
            other => other.display_name(),
        }
    }

    fn offset_only(&self, offset: u64) -> String {
        format!(" LIMIT {} OFFSET {offset}", u64::MAX)
    }

    fn name(&self) -> &'static str {
        "mysql"
    }
}

/// Hive family dialect (Impala)
pub struct HiveDialect {
    dialect: SqlParserHive,
}

impl HiveDialect {
    /// Create a new Hive dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserHive {},
        }
    }
}

impl Default for HiveDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for HiveDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Hive
    }

    fn quote_ident(&self, ident: &str) -> String {
        quote_backtick(ident)
    }

    fn cast_type(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::String { .. } => "STRING".into(),
            other => other.display_name(),
        }
    }

    fn offset_only(&self, offset: u64) -> String {
        format!(" LIMIT {} OFFSET {offset}", i64::MAX)
    }

    fn name(&self) -> &'static str {
        "hive"
    }
}

/// Oracle dialect (12c and later)
pub struct OracleDialect {
    dialect: SqlParserOracle,
}

impl OracleDialect {
    /// Create a new Oracle dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserOracle,
        }
    }
}

impl Default for OracleDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for OracleDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Oracle
    }

    /// Oracle rejects `AS` before a table alias.
    fn table_alias(&self, relation: &str, alias: &str) -> String {
        format!("{relation} {alias}")
    }

    fn set_operator(&self, kind: SetOpKind, multiplicity: Multiplicity) -> String {
        let keyword = match kind {
            SetOpKind::Except => "MINUS",
            other => other.keyword(),
        };
        match multiplicity {
            Multiplicity::Distinct => keyword.to_string(),
            Multiplicity::All => format!("{keyword} ALL"),
        }
    }

    fn cast_type(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::Boolean => "NUMBER(1)".into(),
            SqlType::Integer { bits } => match bits {
                IntBitWidth::I8 => "NUMBER(3)".into(),
                IntBitWidth::I16 => "NUMBER(5)".into(),
                IntBitWidth::I32 => "NUMBER(10)".into(),
                IntBitWidth::I64 => "NUMBER(19)".into(),
            },
            SqlType::HugeInt => "NUMBER(38)".into(),
            SqlType::Float {
                bits: FloatBitWidth::F32,
            } => "BINARY_FLOAT".into(),
            SqlType::Float {
                bits: FloatBitWidth::F64,
            } => "BINARY_DOUBLE".into(),
            SqlType::Decimal {
                precision: Some(p),
                scale: Some(s),
            } => format!("NUMBER({p},{s})"),
            SqlType::Decimal {
                precision: Some(p),
                scale: None,
            } => format!("NUMBER({p})"),
            SqlType::Decimal { .. } => "NUMBER".into(),
            SqlType::String { max_length: None } => "VARCHAR2(4000)".into(),
            SqlType::String {
                max_length: Some(n),
            } => format!("VARCHAR2({n})"),
            SqlType::Binary => "BLOB".into(),
            SqlType::Json => "CLOB".into(),
            SqlType::Uuid => "RAW(16)".into(),
            other => other.display_name(),
        }
    }

    /// Oracle has no LIMIT: `OFFSET n ROWS` and `FETCH FIRST|NEXT n ROWS ONLY`
    /// follow the ORDER BY.
    fn render_select(&self, select: &SelectWrap<'_>) -> String {
        let mut sql = String::from("SELECT ");
        if select.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(select.projection);
        sql.push_str(" FROM ");
        sql.push_str(select.from);
        if let Some(order_by) = select.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        if let Some(offset) = select.offset {
            sql.push_str(&format!(" OFFSET {offset} ROWS"));
        }
        if let Some(limit) = select.limit {
            let position = if select.offset.is_some() {
                "NEXT"
            } else {
                "FIRST"
            };
            sql.push_str(&format!(" FETCH {position} {limit} ROWS ONLY"));
        }
        sql
    }

    fn name(&self) -> &'static str {
        "oracle"
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
