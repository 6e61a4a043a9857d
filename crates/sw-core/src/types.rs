//! SQL type system shared by schemas, reconciliation, and dialect rendering

use serde::{Deserialize, Serialize};

/// Valid bit widths for integer types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IntBitWidth {
    /// 8-bit (TINYINT)
    I8,
    /// 16-bit (SMALLINT)
    I16,
    /// 32-bit (INTEGER)
    I32,
    /// 64-bit (BIGINT)
    I64,
}

impl std::fmt::Display for IntBitWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntBitWidth::I8 => write!(f, "8"),
            IntBitWidth::I16 => write!(f, "16"),
            IntBitWidth::I32 => write!(f, "32"),
            IntBitWidth::I64 => write!(f, "64"),
        }
    }
}

/// Valid bit widths for floating-point types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FloatBitWidth {
    /// 32-bit (FLOAT / REAL)
    F32,
    /// 64-bit (DOUBLE)
    F64,
}

impl std::fmt::Display for FloatBitWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FloatBitWidth::F32 => write!(f, "32"),
            FloatBitWidth::F64 => write!(f, "64"),
        }
    }
}

/// Declared SQL column type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// Boolean (BOOL, BOOLEAN)
    Boolean,
    /// Integer types: TINYINT(8), SMALLINT(16), INT(32), BIGINT(64)
    Integer { bits: IntBitWidth },
    /// 128-bit integer
    HugeInt,
    /// Floating-point: FLOAT(32), DOUBLE(64)
    Float { bits: FloatBitWidth },
    /// Exact numeric with optional precision and scale
    Decimal {
        precision: Option<u16>,
        scale: Option<u16>,
    },
    /// Character/string types with optional max length
    String { max_length: Option<u32> },
    /// DATE
    Date,
    /// TIME
    Time,
    /// TIMESTAMP / DATETIME
    Timestamp,
    /// INTERVAL
    Interval,
    /// BINARY / BLOB
    Binary,
    /// JSON
    Json,
    /// UUID
    Uuid,
    /// Array/List type (INTEGER[], VARCHAR[], ...)
    Array(Box<SqlType>),
    /// Type name we do not model; only matches an identical name
    Unknown(String),
}

impl SqlType {
    /// Find the narrowest type both `self` and `other` widen to without loss.
    ///
    /// Identical types always succeed. Otherwise only these widenings apply:
    /// integers by bit width (then HUGEINT), floats by bit width, VARCHAR by
    /// length (unbounded wins), DECIMAL by precision when the scale matches,
    /// and arrays element-wise. Anything else, including integer/float mixes,
    /// returns `None`.
    pub fn widen(&self, other: &SqlType) -> Option<SqlType> {
        if self == other {
            return Some(self.clone());
        }
        match (self, other) {
            (SqlType::Integer { bits: a }, SqlType::Integer { bits: b }) => {
                Some(SqlType::Integer { bits: (*a).max(*b) })
            }
            (SqlType::HugeInt, SqlType::Integer { .. })
            | (SqlType::Integer { .. }, SqlType::HugeInt) => Some(SqlType::HugeInt),
            (SqlType::Float { bits: a }, SqlType::Float { bits: b }) => {
                Some(SqlType::Float { bits: (*a).max(*b) })
            }
            (
                SqlType::Decimal {
                    precision: p1,
                    scale: s1,
                },
                SqlType::Decimal {
                    precision: p2,
                    scale: s2,
                },
            ) if s1 == s2 => {
                let precision = match (p1, p2) {
                    (Some(a), Some(b)) => Some((*a).max(*b)),
                    (a, b) if a == b => *a,
                    _ => return None,
                };
                Some(SqlType::Decimal {
                    precision,
                    scale: *s1,
                })
            }
            (SqlType::String { max_length: a }, SqlType::String { max_length: b }) => {
                let max_length = match (a, b) {
                    (Some(a), Some(b)) => Some((*a).max(*b)),
                    _ => None,
                };
                Some(SqlType::String { max_length })
            }
            (SqlType::Array(a), SqlType::Array(b)) => {
                a.widen(b).map(|inner| SqlType::Array(Box::new(inner)))
            }
            _ => None,
        }
    }

    /// Human-readable display name (ANSI/DuckDB spelling)
    pub fn display_name(&self) -> String {
        match self {
            SqlType::Boolean => "BOOLEAN".into(),
            SqlType::Integer { bits } => match bits {
                IntBitWidth::I8 => "TINYINT".into(),
                IntBitWidth::I16 => "SMALLINT".into(),
                IntBitWidth::I32 => "INTEGER".into(),
                IntBitWidth::I64 => "BIGINT".into(),
            },
            SqlType::HugeInt => "HUGEINT".into(),
            SqlType::Float {
                bits: FloatBitWidth::F32,
            } => "FLOAT".into(),
            SqlType::Float {
                bits: FloatBitWidth::F64,
            } => "DOUBLE".into(),
            SqlType::Decimal {
                precision: Some(p),
                scale: Some(s),
            } => format!("DECIMAL({p},{s})"),
            SqlType::Decimal {
                precision: Some(p), ..
            } => format!("DECIMAL({p})"),
            SqlType::Decimal { .. } => "DECIMAL".into(),
            SqlType::String {
                max_length: Some(n),
            } => format!("VARCHAR({n})"),
            SqlType::String { .. } => "VARCHAR".into(),
            SqlType::Date => "DATE".into(),
            SqlType::Time => "TIME".into(),
            SqlType::Timestamp => "TIMESTAMP".into(),
            SqlType::Interval => "INTERVAL".into(),
            SqlType::Binary => "BLOB".into(),
            SqlType::Json => "JSON".into(),
            SqlType::Uuid => "UUID".into(),
            SqlType::Array(inner) => format!("{}[]", inner.display_name()),
            SqlType::Unknown(name) => name.clone(),
        }
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Nullability state of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    /// Guaranteed not null
    NotNull,
    /// May contain nulls
    Nullable,
    /// Nullability could not be determined
    #[default]
    Unknown,
}

impl Nullability {
    /// Combine two nullability states: if either is nullable, result is nullable
    pub fn combine(self, other: Nullability) -> Nullability {
        match (self, other) {
            (Nullability::Nullable, _) | (_, Nullability::Nullable) => Nullability::Nullable,
            (Nullability::Unknown, _) | (_, Nullability::Unknown) => Nullability::Unknown,
            _ => Nullability::NotNull,
        }
    }
}

impl std::fmt::Display for Nullability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Nullability::NotNull => write!(f, "NOT NULL"),
            Nullability::Nullable => write!(f, "NULLABLE"),
            Nullability::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Parse a SQL type string (from a plan file or config) into SqlType
pub fn parse_sql_type(s: &str) -> SqlType {
    let upper = s.trim().to_uppercase();

    match upper.as_str() {
        "BOOL" | "BOOLEAN" => SqlType::Boolean,

        "TINYINT" | "INT1" => SqlType::Integer {
            bits: IntBitWidth::I8,
        },
        "SMALLINT" | "INT2" => SqlType::Integer {
            bits: IntBitWidth::I16,
        },
        "INT" | "INTEGER" | "INT4" | "INT32" => SqlType::Integer {
            bits: IntBitWidth::I32,
        },
        "BIGINT" | "INT8" | "INT64" | "LONG" => SqlType::Integer {
            bits: IntBitWidth::I64,
        },
        "HUGEINT" | "INT128" => SqlType::HugeInt,

        "FLOAT" | "REAL" | "FLOAT4" | "FLOAT32" => SqlType::Float {
            bits: FloatBitWidth::F32,
        },
        "DOUBLE" | "DOUBLE PRECISION" | "FLOAT8" | "FLOAT64" => SqlType::Float {
            bits: FloatBitWidth::F64,
        },

        "DECIMAL" | "NUMERIC" => SqlType::Decimal {
            precision: None,
            scale: None,
        },

        "VARCHAR" | "TEXT" | "STRING" | "CHAR" | "CHARACTER VARYING" => {
            SqlType::String { max_length: None }
        }

        "DATE" => SqlType::Date,
        "TIME" => SqlType::Time,
        "TIMESTAMP" | "DATETIME" => SqlType::Timestamp,
        "INTERVAL" => SqlType::Interval,
        "BLOB" | "BINARY" | "BYTEA" | "VARBINARY" | "BYTES" => SqlType::Binary,
        "JSON" | "JSONB" => SqlType::Json,
        "UUID" => SqlType::Uuid,

        _ => try_parse_parameterized(s).unwrap_or_else(|| SqlType::Unknown(upper.clone())),
    }
}

/// Parse `TYPE[]`, `VARCHAR(n)`, `DECIMAL(p[,s])`
fn try_parse_parameterized(s: &str) -> Option<SqlType> {
    let trimmed = s.trim();
    if let Some(inner) = trimmed.strip_suffix("[]") {
        return Some(SqlType::Array(Box::new(parse_sql_type(inner))));
    }

    let upper = trimmed.to_uppercase();
    let open = upper.find('(')?;
    let close = upper.rfind(')')?;
    if close < open {
        log::warn!("Unbalanced parentheses in type string: {:?}", s);
        return None;
    }
    let base = upper[..open].trim();
    let params = &upper[open + 1..close];

    match base {
        "VARCHAR" | "CHAR" | "CHARACTER VARYING" | "TEXT" | "STRING" => {
            let len: u32 = params.trim().parse().ok()?;
            Some(SqlType::String {
                max_length: Some(len),
            })
        }
        "DECIMAL" | "NUMERIC" => {
            let mut parts = params.split(',');
            let precision: u16 = parts.next()?.trim().parse().ok()?;
            let scale = parts.next().and_then(|s| s.trim().parse().ok());
            Some(SqlType::Decimal {
                precision: Some(precision),
                scale,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
