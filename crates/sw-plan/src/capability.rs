//! Capability gate: per-backend support for each set-operation variant

use crate::error::{PlanError, PlanResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use sw_core::{
    BackendName, BackendOverride, Config, CoreError, DialectKind, Multiplicity, SetOpKind,
    SupportSetting,
};

/// Rewrite used when a backend lacks a native operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmulationStrategy {
    /// Number duplicates with `ROW_NUMBER()` and apply the DISTINCT operator
    /// over `(columns, row number)`; INTERSECT ALL / EXCEPT ALL only
    RowNumber,
    /// `SELECT DISTINCT` over a UNION ALL; UNION DISTINCT only
    DistinctOverUnionAll,
}

impl EmulationStrategy {
    /// Native operator the rewrite is built from when emulating `kind`
    pub fn prerequisite(&self, kind: SetOpKind) -> (SetOpKind, Multiplicity) {
        match self {
            EmulationStrategy::RowNumber => (kind, Multiplicity::Distinct),
            EmulationStrategy::DistinctOverUnionAll => (SetOpKind::Union, Multiplicity::All),
        }
    }

    /// The rewrite available for an entry, if any
    pub fn for_entry(kind: SetOpKind, multiplicity: Multiplicity) -> Option<Self> {
        match (kind, multiplicity) {
            (SetOpKind::Union, Multiplicity::Distinct) => {
                Some(EmulationStrategy::DistinctOverUnionAll)
            }
            (SetOpKind::Intersect | SetOpKind::Except, Multiplicity::All) => {
                Some(EmulationStrategy::RowNumber)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for EmulationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmulationStrategy::RowNumber => write!(f, "row_number"),
            EmulationStrategy::DistinctOverUnionAll => write!(f, "distinct_over_union_all"),
        }
    }
}

/// How a backend handles one (kind, multiplicity) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Support {
    /// Lower to the backend's own operator
    Native,
    /// Lower through a rewrite
    Emulated(EmulationStrategy),
    /// Lowering fails with `UnsupportedOperation`
    Unsupported,
}

impl Support {
    fn from_setting(setting: SupportSetting, kind: SetOpKind, multiplicity: Multiplicity) -> Self {
        match setting {
            SupportSetting::Supported => Support::Native,
            SupportSetting::Unsupported => Support::Unsupported,
            SupportSetting::Emulated => match EmulationStrategy::for_entry(kind, multiplicity) {
                Some(strategy) => Support::Emulated(strategy),
                None => {
                    log::warn!(
                        "{} {} has no emulation; treating it as unsupported",
                        kind,
                        multiplicity
                    );
                    Support::Unsupported
                }
            },
        }
    }
}

impl std::fmt::Display for Support {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Support::Native => write!(f, "native"),
            Support::Emulated(strategy) => write!(f, "emulated({strategy})"),
            Support::Unsupported => write!(f, "unsupported"),
        }
    }
}

impl Serialize for Support {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Capability table of one backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendCapabilities {
    /// Backend id
    pub name: BackendName,
    /// Dialect family used for rendering
    pub dialect: DialectKind,
    pub union_distinct: Support,
    pub union_all: Support,
    pub intersect_distinct: Support,
    pub intersect_all: Support,
    pub except_distinct: Support,
    pub except_all: Support,
    /// Whether ORDER BY may appear inside a set-operation operand subquery
    pub subquery_order_supported: bool,
}

impl BackendCapabilities {
    /// A backend with every operator native and operand ordering allowed
    pub fn native(name: BackendName, dialect: DialectKind) -> Self {
        Self {
            name,
            dialect,
            union_distinct: Support::Native,
            union_all: Support::Native,
            intersect_distinct: Support::Native,
            intersect_all: Support::Native,
            except_distinct: Support::Native,
            except_all: Support::Native,
            subquery_order_supported: true,
        }
    }

    fn with_all(mut self, intersect_all: Support, except_all: Support) -> Self {
        self.intersect_all = intersect_all;
        self.except_all = except_all;
        self
    }

    /// Support recorded for a pair
    pub fn support(&self, kind: SetOpKind, multiplicity: Multiplicity) -> Support {
        *self.slot(kind, multiplicity)
    }

    /// Replace the support recorded for a pair
    pub fn set_support(&mut self, kind: SetOpKind, multiplicity: Multiplicity, support: Support) {
        *self.slot_mut(kind, multiplicity) = support;
    }

    fn slot(&self, kind: SetOpKind, multiplicity: Multiplicity) -> &Support {
        match (kind, multiplicity) {
            (SetOpKind::Union, Multiplicity::Distinct) => &self.union_distinct,
            (SetOpKind::Union, Multiplicity::All) => &self.union_all,
            (SetOpKind::Intersect, Multiplicity::Distinct) => &self.intersect_distinct,
            (SetOpKind::Intersect, Multiplicity::All) => &self.intersect_all,
            (SetOpKind::Except, Multiplicity::Distinct) => &self.except_distinct,
            (SetOpKind::Except, Multiplicity::All) => &self.except_all,
        }
    }

    fn slot_mut(&mut self, kind: SetOpKind, multiplicity: Multiplicity) -> &mut Support {
        match (kind, multiplicity) {
            (SetOpKind::Union, Multiplicity::Distinct) => &mut self.union_distinct,
            (SetOpKind::Union, Multiplicity::All) => &mut self.union_all,
            (SetOpKind::Intersect, Multiplicity::Distinct) => &mut self.intersect_distinct,
            (SetOpKind::Intersect, Multiplicity::All) => &mut self.intersect_all,
            (SetOpKind::Except, Multiplicity::Distinct) => &mut self.except_distinct,
            (SetOpKind::Except, Multiplicity::All) => &mut self.except_all,
        }
    }

    /// All six (kind, multiplicity) entries, in declaration order
    pub fn entries(&self) -> Vec<(SetOpKind, Multiplicity, Support)> {
        SetOpKind::ALL
            .iter()
            .flat_map(|&kind| {
                Multiplicity::ALL
                    .iter()
                    .map(move |&m| (kind, m, self.support(kind, m)))
            })
            .collect()
    }

    /// Apply an override from a capability file; unset fields are kept
    pub fn apply(&mut self, over: &BackendOverride) {
        if let Some(dialect) = over.dialect {
            self.dialect = dialect;
        }
        let settings = [
            (SetOpKind::Union, Multiplicity::Distinct, over.union_distinct),
            (SetOpKind::Union, Multiplicity::All, over.union_all),
            (SetOpKind::Intersect, Multiplicity::Distinct, over.intersect_distinct),
            (SetOpKind::Intersect, Multiplicity::All, over.intersect_all),
            (SetOpKind::Except, Multiplicity::Distinct, over.except_distinct),
            (SetOpKind::Except, Multiplicity::All, over.except_all),
        ];
        for (kind, multiplicity, setting) in settings {
            if let Some(setting) = setting {
                self.set_support(
                    kind,
                    multiplicity,
                    Support::from_setting(setting, kind, multiplicity),
                );
            }
        }
        if let Some(ordered) = over.subquery_order_supported {
            self.subquery_order_supported = ordered;
        }
    }

    /// Decide how to lower a pair, or fail.
    ///
    /// An emulated entry whose prerequisite operator is not native is as
    /// good as unsupported. Never falls back to a different multiplicity.
    pub fn resolve(&self, kind: SetOpKind, multiplicity: Multiplicity) -> PlanResult<Support> {
        let unsupported = || PlanError::UnsupportedOperation {
            backend: self.name.clone(),
            kind,
            multiplicity,
        };
        match self.support(kind, multiplicity) {
            Support::Native => Ok(Support::Native),
            Support::Unsupported => Err(unsupported()),
            Support::Emulated(strategy) => {
                let (base_kind, base_multiplicity) = strategy.prerequisite(kind);
                if self.support(base_kind, base_multiplicity) == Support::Native {
                    Ok(Support::Emulated(strategy))
                } else {
                    log::debug!(
                        "Backend '{}': {} emulation of {} {} needs native {} {}",
                        self.name,
                        strategy,
                        kind,
                        multiplicity,
                        base_kind,
                        base_multiplicity
                    );
                    Err(unsupported())
                }
            }
        }
    }
}

/// Capability tables for all known backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRegistry {
    backends: BTreeMap<BackendName, BackendCapabilities>,
}

/// Built-in registry, built once, reused on every call
static BUILTIN: OnceLock<CapabilityRegistry> = OnceLock::new();

impl CapabilityRegistry {
    /// The built-in capability tables
    pub fn builtin() -> &'static CapabilityRegistry {
        BUILTIN.get_or_init(builtin_registry)
    }

    /// Built-in tables with a capability file's overrides applied.
    ///
    /// A backend that is not built in must name its `dialect`.
    pub fn with_config(config: &Config) -> PlanResult<CapabilityRegistry> {
        let mut registry = Self::builtin().clone();
        for (name, over) in &config.backends {
            match registry.backends.get_mut(name) {
                Some(existing) => {
                    log::debug!("Overriding built-in capabilities for backend '{}'", name);
                    existing.apply(over);
                }
                None => {
                    let dialect = over.dialect.ok_or_else(|| CoreError::ConfigInvalid {
                        message: format!(
                            "backend '{name}' is not built in and must set 'dialect'"
                        ),
                    })?;
                    let mut caps = BackendCapabilities::native(name.clone(), dialect);
                    caps.apply(over);
                    registry.insert(caps);
                }
            }
        }
        Ok(registry)
    }

    /// Look up a backend by id (case-insensitive)
    pub fn get(&self, name: &str) -> PlanResult<&BackendCapabilities> {
        BackendName::try_new(name)
            .and_then(|key| self.backends.get(&key))
            .ok_or_else(|| PlanError::UnknownBackend(name.to_string()))
    }

    /// All backends, sorted by id
    pub fn backends(&self) -> impl Iterator<Item = &BackendCapabilities> {
        self.backends.values()
    }

    /// Add or replace a backend's table
    pub fn insert(&mut self, caps: BackendCapabilities) {
        self.backends.insert(caps.name.clone(), caps);
    }
}

fn builtin_registry() -> CapabilityRegistry {
    use DialectKind as D;
    use EmulationStrategy::RowNumber;
    use Support::{Emulated, Native, Unsupported};

    let native = |name: &str, dialect| BackendCapabilities::native(BackendName::new(name), dialect);

    let mut druid = native("druid", D::Generic).with_all(Unsupported, Unsupported);
    druid.union_distinct = Emulated(EmulationStrategy::DistinctOverUnionAll);
    druid.intersect_distinct = Unsupported;
    druid.except_distinct = Unsupported;

    let mut mssql = native("mssql", D::MsSql).with_all(Emulated(RowNumber), Emulated(RowNumber));
    mssql.subquery_order_supported = false;

    let backends = [
        native("duckdb", D::DuckDb),
        native("postgres", D::Postgres),
        native("datafusion", D::Generic),
        native("trino", D::Generic),
        native("mysql", D::MySql),
        native("clickhouse", D::Generic).with_all(Unsupported, Unsupported),
        native("oracle", D::Oracle).with_all(Unsupported, Unsupported),
        native("impala", D::Hive).with_all(Unsupported, Unsupported),
        native("risingwave", D::Postgres).with_all(Unsupported, Unsupported),
        native("sqlite", D::Sqlite).with_all(Emulated(RowNumber), Emulated(RowNumber)),
        native("snowflake", D::Snowflake).with_all(Emulated(RowNumber), Emulated(RowNumber)),
        native("bigquery", D::BigQuery).with_all(Emulated(RowNumber), Emulated(RowNumber)),
        native("exasol", D::Generic).with_all(Emulated(RowNumber), Emulated(RowNumber)),
        mssql,
        druid,
    ];

    debug_assert!(backends.iter().all(|b| b.union_all == Native));

    CapabilityRegistry {
        backends: backends
            .into_iter()
            .map(|caps| (caps.name.clone(), caps))
            .collect(),
    }
}

#[cfg(test)]
#[path = "capability_test.rs"]
mod tests;
