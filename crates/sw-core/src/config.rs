//! Capability configuration parsing for setwise.yml

use crate::backend_name::BackendName;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Capability overrides loaded from setwise.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Per-backend overrides, keyed by backend id
    #[serde(default)]
    pub backends: BTreeMap<BackendName, BackendOverride>,

    /// What to do with ORDER BY on an operand the backend cannot order
    #[serde(default)]
    pub order_policy: OrderPolicy,
}

/// Override of one backend's capability entries.
///
/// Every field is optional; unset fields keep the built-in value. A backend
/// that is not built in must set `dialect`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendOverride {
    /// SQL dialect family used to render this backend's SQL
    #[serde(default)]
    pub dialect: Option<DialectKind>,

    /// UNION (DISTINCT)
    #[serde(default)]
    pub union_distinct: Option<SupportSetting>,

    /// UNION ALL
    #[serde(default)]
    pub union_all: Option<SupportSetting>,

    /// INTERSECT (DISTINCT)
    #[serde(default)]
    pub intersect_distinct: Option<SupportSetting>,

    /// INTERSECT ALL
    #[serde(default)]
    pub intersect_all: Option<SupportSetting>,

    /// EXCEPT (DISTINCT)
    #[serde(default)]
    pub except_distinct: Option<SupportSetting>,

    /// EXCEPT ALL
    #[serde(default)]
    pub except_all: Option<SupportSetting>,

    /// Whether ORDER BY is accepted inside a set-operation operand subquery
    #[serde(default)]
    pub subquery_order_supported: Option<bool>,
}

/// Support level as written in a capability file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportSetting {
    /// The backend has a native operator
    Supported,
    /// The backend has no operator and no rewrite is allowed
    Unsupported,
    /// Use the rewrite defined for this entry
    Emulated,
}

/// Handling of operand ORDER BY on backends that reject it in subqueries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderPolicy {
    /// Drop the inner ordering and record a diagnostic (default)
    #[default]
    Drop,
    /// Fail compilation
    Strict,
}

impl std::fmt::Display for OrderPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderPolicy::Drop => write!(f, "drop"),
            OrderPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// SQL dialect family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// ANSI-style SQL with double-quoted identifiers
    Generic,
    /// DuckDB
    DuckDb,
    /// PostgreSQL and wire-compatible engines
    Postgres,
    /// SQLite
    Sqlite,
    /// Microsoft SQL Server
    MsSql,
    /// Snowflake
    Snowflake,
    /// Google BigQuery
    BigQuery,
    /// MySQL
    MySql,
    /// Hive family (Impala)
    Hive,
    /// Oracle Database
    Oracle,
}

impl std::fmt::Display for DialectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DialectKind::Generic => "generic",
            DialectKind::DuckDb => "duckdb",
            DialectKind::Postgres => "postgres",
            DialectKind::Sqlite => "sqlite",
            DialectKind::MsSql => "mssql",
            DialectKind::Snowflake => "snowflake",
            DialectKind::BigQuery => "bigquery",
            DialectKind::MySql => "mysql",
            DialectKind::Hive => "hive",
            DialectKind::Oracle => "oracle",
        };
        f.write_str(name)
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a directory
    /// Looks for setwise.yml or setwise.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("setwise.yml");
        let yaml_path = dir.join("setwise.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject `emulated` on entries that have no rewrite
    fn validate(&self) -> CoreResult<()> {
        for (name, backend) in &self.backends {
            let no_rewrite = [
                ("union_all", backend.union_all),
                ("intersect_distinct", backend.intersect_distinct),
                ("except_distinct", backend.except_distinct),
            ];
            for (key, setting) in no_rewrite {
                if setting == Some(SupportSetting::Emulated) {
                    return Err(CoreError::ConfigInvalid {
                        message: format!(
                            "backend '{name}': '{key}' has no emulation, use supported or unsupported"
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Get the override for a backend, if any
    pub fn get_backend(&self, name: &str) -> Option<&BackendOverride> {
        self.backends.get(name)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
